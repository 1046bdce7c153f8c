mod admin_tests;
mod listings_tests;
