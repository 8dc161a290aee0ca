//! Integration tests

mod bot_test;
mod feed_test;
mod support;
