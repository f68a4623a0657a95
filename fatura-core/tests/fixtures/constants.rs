#![allow(dead_code)]

pub const TEST_TAX_ID: &str = "500123456";
pub const TEST_DOCUMENT_NO: &str = "FT 2025/00001";
pub const TEST_SECOND_DOCUMENT_NO: &str = "FT 2025/00002";
pub const TEST_CURRENCY: &str = "AOA";
pub const TEST_SIGNING_KEY_FILE: &str = "tests/fixtures/test_signing_key.pem";
