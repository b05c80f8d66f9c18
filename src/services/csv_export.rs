use crate::models::TrackRow;
use std::borrow::Cow;

pub const CSV_FIELDS: [&str; 7] = [
    "Track #",
    "Name",
    "Artists",
    "Album",
    "Duration (ms)",
    "Duration",
    "Added At",
];

/// Renders rows as a UTF-8 CSV document with a header line.
///
/// Lines end in `\r\n` and fields are quoted only when they contain a comma,
/// a quote or a line break.
pub fn generate_csv(rows: &[TrackRow]) -> Vec<u8> {
    let mut output = String::new();
    push_record(&mut output, CSV_FIELDS.iter().copied());

    for row in rows {
        let track_number = row.track_number.to_string();
        let duration_ms = row.duration_ms.map(|ms| ms.to_string()).unwrap_or_default();
        push_record(
            &mut output,
            [
                track_number.as_str(),
                row.name.as_str(),
                row.artists.as_str(),
                row.album.as_str(),
                duration_ms.as_str(),
                row.duration.as_str(),
                row.added_at.as_str(),
            ],
        );
    }

    output.into_bytes()
}

fn push_record<'a>(output: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            output.push(',');
        }
        output.push_str(&escape_field(field));
    }
    output.push_str("\r\n");
}

fn escape_field(field: &str) -> Cow<str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
