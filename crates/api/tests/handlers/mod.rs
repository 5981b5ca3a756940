mod bookings_test;
mod middleware_test;
