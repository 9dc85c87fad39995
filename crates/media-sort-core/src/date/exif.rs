use chrono::{NaiveDate, NaiveTime};
use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

use super::Timestamp;
use crate::error::{MediaSortError, Result};

/// Capture time first, then digitization, then the generic image timestamp.
pub const IMAGE_DATE_TAGS: [Tag; 3] = [Tag::DateTimeOriginal, Tag::DateTimeDigitized, Tag::DateTime];

/// Return the raw value of the first of `tags` present in the file's EXIF data.
/// A file without any EXIF block, or in a format that cannot carry one
/// (BMP, GIF), behaves like one with none of the tags.
pub fn read_first_tag(path: &Path, tags: &[Tag]) -> Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let exif = match Reader::new().read_from_container(&mut reader) {
        Ok(exif) => Some(exif),
        Err(exif::Error::NotFound(_)) => None,
        Err(exif::Error::InvalidFormat(reason)) => {
            debug!("No EXIF container in {}: {}", path.display(), reason);
            None
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(exif) = &exif {
        debug!("{} EXIF fields in {}", exif.fields().count(), path.display());
        for tag in tags {
            if let Some(field) = exif.get_field(*tag, In::PRIMARY) {
                let raw = raw_value(&field.value).unwrap_or_else(|| field.display_value().to_string());
                debug!("TAG '{}': {:?}", tag, raw);
                return Ok(raw);
            }
        }
    }

    Err(MediaSortError::TagNotFound {
        tags: tags.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(", "),
        path: path.to_path_buf(),
    })
}

fn raw_value(value: &Value) -> Option<String> {
    match value {
        Value::Ascii(parts) => parts
            .iter()
            .find(|p| !p.is_empty())
            .map(|p| String::from_utf8_lossy(p).trim_end_matches('\0').to_string()),
        _ => None,
    }
}

/// Date/time of an image from its EXIF tags.
pub fn image_datetime(path: &Path) -> Result<Timestamp> {
    let raw = read_first_tag(path, &IMAGE_DATE_TAGS)?;
    parse_image_datetime(&raw)
}

/// EXIF datetimes are `YYYY:MM:DD HH:MM:SS` with no zone information.
pub fn parse_image_datetime(raw: &str) -> Result<Timestamp> {
    let invalid = || MediaSortError::InvalidImageDateTime(raw.to_string());

    let mut tokens = raw.split_whitespace();
    let (Some(date), Some(time), None) = (tokens.next(), tokens.next(), tokens.next()) else {
        return Err(invalid());
    };

    let date = NaiveDate::parse_from_str(&date.replace(':', "-"), "%Y-%m-%d").map_err(|_| invalid())?;
    let time = NaiveTime::parse_from_str(time, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
        .map_err(|_| invalid())?;

    Ok(Timestamp::new(date.and_time(time), None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use exif::Field;
    use std::io::Cursor;

    fn write_tiff(path: &Path, fields: &[(Tag, &str)]) {
        let fields: Vec<Field> = fields
            .iter()
            .map(|(tag, value)| Field {
                tag: *tag,
                ifd_num: In::PRIMARY,
                value: Value::Ascii(vec![value.as_bytes().to_vec()]),
            })
            .collect();
        let mut writer = exif::experimental::Writer::new();
        for field in &fields {
            writer.push_field(field);
        }
        let mut buf = Cursor::new(Vec::new());
        writer.write(&mut buf, false).unwrap();
        std::fs::write(path, buf.into_inner()).unwrap();
    }

    #[test]
    fn test_parse_image_datetime() {
        let ts = parse_image_datetime("2016:05:04 03:02:01").unwrap();
        assert_eq!(ts.base_name(), "2016-05-04_03-02-01");
        assert_eq!(ts.offset(), None);

        assert!(parse_image_datetime("2016:05:04").is_err());
        assert!(parse_image_datetime("    :  :     :  :  ").is_err());
        assert!(parse_image_datetime("2016:05:04 03:02:01 extra").is_err());
    }

    #[test]
    fn test_original_wins_over_generic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.tif");
        write_tiff(
            &path,
            &[
                (Tag::DateTime, "2021:01:01 00:00:00"),
                (Tag::DateTimeOriginal, "2016:05:04 03:02:01"),
            ],
        );

        assert_eq!(read_first_tag(&path, &IMAGE_DATE_TAGS).unwrap(), "2016:05:04 03:02:01");
        assert_eq!(image_datetime(&path).unwrap().base_name(), "2016-05-04_03-02-01");
    }

    #[test]
    fn test_falls_back_to_generic_datetime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.tif");
        write_tiff(&path, &[(Tag::DateTime, "2009:10:11 12:13:14")]);

        assert_eq!(image_datetime(&path).unwrap().base_name(), "2009-10-11_12-13-14");
    }

    #[test]
    fn test_formats_without_exif_have_no_tags() {
        let dir = tempfile::tempdir().unwrap();
        // 1x1 GIF and BMP headers
        let gif = b"GIF89a\x01\x00\x01\x00\x00\x00\x00;".to_vec();
        let mut bmp = b"BM".to_vec();
        bmp.extend_from_slice(&[0u8; 52]);

        for (name, bytes) in [("anim.gif", gif), ("paint.bmp", bmp)] {
            let path = dir.path().join(name);
            std::fs::write(&path, bytes).unwrap();
            assert!(
                matches!(image_datetime(&path), Err(MediaSortError::TagNotFound { .. })),
                "{} should have no date tags",
                name
            );
        }
    }

    #[test]
    fn test_missing_tags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.tif");
        write_tiff(&path, &[(Tag::ImageDescription, "no dates here")]);

        match image_datetime(&path) {
            Err(MediaSortError::TagNotFound { tags, path: p }) => {
                assert!(tags.contains("DateTimeOriginal"));
                assert_eq!(p, path);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
