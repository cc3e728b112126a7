pub mod s3;
pub mod traits;

use chrono::{DateTime, TimeZone};
use std::fmt::Display;

pub use s3::S3Storage;
pub use traits::{ObjectStorage, PutResult};

/// Object key of the form `<prefix><YYYY-MM-DD>/<HH-MM-SS>.jpg`.
pub fn object_key<Tz>(prefix: &str, at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("{}{}.jpg", prefix, at.format("%Y-%m-%d/%H-%M-%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_object_key_layout() {
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap();
        assert_eq!(object_key("test_", &at), "test_2024-03-07/09-05-02.jpg");
        assert_eq!(
            object_key("posterName_", &at),
            "posterName_2024-03-07/09-05-02.jpg"
        );
    }

    #[test]
    fn test_object_key_uses_given_offset() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let at = offset.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(object_key("test_", &at), "test_2024-12-31/23-59-59.jpg");
    }
}
