/// Converts an hour of the day in UTC into the local hour for a fixed offset.
///
/// The wrap is applied once, so the result is only guaranteed to lie in
/// `0..=23` for `utc_hour` in `0..=23` and `offset` in `-23..=23`. Callers
/// are expected to validate the offset before it gets here.
pub fn to_local_hour(utc_hour: u32, offset: i32) -> u32 {
    debug_assert!(utc_hour <= 23, "utc hour {utc_hour} out of range");
    debug_assert!(offset.abs() <= 23, "utc offset {offset} out of range");

    let mut hour = utc_hour as i32 + offset;
    if offset > 0 {
        if hour > 23 { hour -= 24; }
    } else if offset < 0 {
        if hour < 0 { hour += 24; }
    }
    hour as u32
}
