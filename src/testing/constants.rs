//! Common test values shared across fixtures and tests

pub const TEST_USERNAME: &str = "alice";
pub const TEST_PASSWORD: &str = "correct-horse-battery-staple";
pub const TEST_EMAIL: &str = "alice@example.com";
pub const TEST_OTP_CODE: &str = "123456";
pub const TEST_TOKEN: &str = "test-opaque-backend-token";
pub const TEST_SECRET: &str = "test-secret-key-that-is-32-chars!";
