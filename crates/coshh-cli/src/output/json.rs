use coshh_core::error::CoshhError;
use serde::Serialize;

pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<(), CoshhError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
