mod mtls_tests;
mod shared_secret_tests;
