mod test_utils;

mod appointment_test;
mod catalog_test;
mod middleware_test;
