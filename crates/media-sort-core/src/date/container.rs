use tracing::{debug, error};

use super::parse::parse_timestamp;
use super::Timestamp;
use crate::error::{MediaSortError, Result};
use crate::metadata::{ContainerMetadata, StreamKind};

/// Date fields of the general stream, most specific first.
pub const CONTAINER_DATE_FIELDS: [&str; 3] = ["Recorded_Date", "Encoded_Date", "Tagged_Date"];

/// First container date field that is present and parses.
///
/// An empty field is absent. A present field that does not parse is logged
/// and the next field is tried.
pub fn read_container_datetime<M: ContainerMetadata + ?Sized>(info: &M) -> Result<Timestamp> {
    for field in CONTAINER_DATE_FIELDS {
        let value = info.get(StreamKind::General, 0, field);
        if value.is_empty() {
            continue;
        }
        match parse_timestamp(&value) {
            Ok(ts) => {
                debug!("Using {} = {:?}", field, value);
                return Ok(ts);
            }
            Err(e) => error!("Unable to parse date/time '{}'='{}': {}", field, value, e),
        }
    }

    Err(MediaSortError::NoContainerDate {
        fields: CONTAINER_DATE_FIELDS.join(", "),
    })
}
