// Main test entry point for lattice-resolve
// This file organizes and loads all test modules

mod common;
mod error_tests;
mod resolver_tests;
