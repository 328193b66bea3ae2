use std::io;

use serde::Serialize;

use crate::error::DataError;
use crate::sweep::SweepPoint;

// Write a sweep as `parameter,accuracy` rows, ready for plotting elsewhere
pub fn write_csv<P: Serialize>(
    writer: impl io::Write,
    points: &[SweepPoint<P>],
) -> Result<(), DataError> {
    let mut writer = csv::Writer::from_writer(writer);
    for point in points {
        writer.serialize(point)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}
