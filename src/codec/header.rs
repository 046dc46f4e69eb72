//! The 123-character System I message header.
//!
//! ```text
//! offset  len  field
//!      0   10  system code
//!     10   15  service code
//!     25    3  format code
//!     28   20  request id
//!     48    8  date (YYYYMMDD)
//!     56    6  time (HHMMSS)
//!     62    5  total message length, header included
//!     67    6  response code     (blank on requests)
//!     73   50  response message  (blank on requests)
//! ```

use chrono::{Local, NaiveDateTime};

use crate::codec::fixed::{Field, Layout, RecordReader};
use crate::codec::ProtocolError;
use crate::config::Route;

pub const HEADER_LENGTH: usize = 123;

/// Largest total length the 5-digit length field can carry.
pub const MAX_MESSAGE_LENGTH: usize = 99_999;

pub const SYSTEM: Field = Field::text("System", 0, 10);
pub const SERVICE: Field = Field::text("Service", 10, 15);
pub const FORMAT: Field = Field::text("Format", 25, 3);
pub const REQUEST_ID: Field = Field::text("RequestID", 28, 20);
pub const DATE: Field = Field::text("Date", 48, 8);
pub const TIME: Field = Field::text("Time", 56, 6);
pub const TOTAL_LENGTH: Field = Field::integer("TotalLength", 62, 5);
pub const RESPONSE_CODE: Field = Field::text("ResponseCode", 67, 6);
pub const RESPONSE_MESSAGE: Field = Field::text("ResponseMessage", 73, 50);

pub static HEADER: Layout = Layout {
    name: "Header",
    length: HEADER_LENGTH,
    fields: &[
        SYSTEM,
        SERVICE,
        FORMAT,
        REQUEST_ID,
        DATE,
        TIME,
        TOTAL_LENGTH,
        RESPONSE_CODE,
        RESPONSE_MESSAGE,
    ],
};

/// Build a request header stamped with the local clock.
pub fn build_header(route: &Route, request_id: &str, body_length: usize) -> String {
    build_header_at(route, request_id, body_length, Local::now().naive_local())
}

/// Build a request header for an explicit timestamp.
///
/// A total above [`MAX_MESSAGE_LENGTH`] does not fit the length field and is
/// cut to its leading five digits; callers reject such messages beforehand.
pub fn build_header_at(route: &Route, request_id: &str, body_length: usize, now: NaiveDateTime) -> String {
    let total = HEADER_LENGTH + body_length;
    if total > MAX_MESSAGE_LENGTH {
        tracing::warn!(total, "Message length overflows header length field");
    }

    let mut writer = HEADER.writer();
    writer
        .text(&SYSTEM, &route.system)
        .text(&SERVICE, &route.service)
        .text(&FORMAT, &route.format)
        .text(&REQUEST_ID, request_id)
        .text(&DATE, &now.format("%Y%m%d").to_string())
        .text(&TIME, &now.format("%H%M%S").to_string())
        .integer(&TOTAL_LENGTH, total as i64);
    writer.finish()
}

/// Header fields echoed back by System I.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHeader {
    pub system: String,
    pub service: String,
    pub format: String,
    pub request_id: String,
    pub date: String,
    pub time: String,
    pub total_length: i64,
    pub response_code: String,
    pub response_message: String,
}

impl ResponseHeader {
    pub fn parse(message: &[char]) -> Result<Self, ProtocolError> {
        if message.len() < HEADER_LENGTH {
            return Err(ProtocolError::TooShort { length: message.len(), required: HEADER_LENGTH });
        }
        let reader = RecordReader::new(&message[..HEADER_LENGTH]);
        Ok(Self {
            system: reader.text(&SYSTEM),
            service: reader.text(&SERVICE),
            format: reader.text(&FORMAT),
            request_id: reader.text(&REQUEST_ID),
            date: reader.text(&DATE),
            time: reader.text(&TIME),
            total_length: reader.integer(&TOTAL_LENGTH),
            response_code: reader.raw(&RESPONSE_CODE).trim().to_string(),
            response_message: reader.raw(&RESPONSE_MESSAGE).trim().to_string(),
        })
    }
}
