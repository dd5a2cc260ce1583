use std::{error::Error, path::Path};

use comfy_table::{presets, Table};
use modbus_mei::ReadDeviceIdentificationResponse;

fn object_name(id: u8) -> String {
    match id {
        0x00 => "VendorName".into(),
        0x01 => "ProductCode".into(),
        0x02 => "MajorMinorRevision".into(),
        0x03 => "VendorUrl".into(),
        0x04 => "ProductName".into(),
        0x05 => "ModelName".into(),
        0x06 => "UserApplicationName".into(),
        0x07..=0x7F => "Reserved".into(),
        _ => "Private".into(),
    }
}

/// Printable strings as text, anything else as hex bytes.
fn object_value(data: &[u8]) -> String {
    match std::str::from_utf8(data) {
        Ok(text) if !text.chars().any(char::is_control) => text.to_string(),
        _ => data.iter().map(|v| format!("{v:#04x}")).collect::<Vec<String>>().join(", "),
    }
}

pub fn objects_table(res: &ReadDeviceIdentificationResponse) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.set_header(["Id", "Description", "Value"]);

    for (id, data) in res.objects.iter() {
        table.add_row([format!("{id:#04x}"), object_name(id), object_value(data)]);
    }

    table
}

pub fn print_response(res: &ReadDeviceIdentificationResponse) {
    println!(
        "read code {:#04x}, conformity {:#04x}, more follows {}, next object {:#04x}, {} objects",
        u8::from(res.device_id_code),
        u8::from(res.conformity_level),
        res.more_follows,
        res.next_object_id,
        res.number_of_objects
    );
    println!("{}", objects_table(res));
}

pub fn export_csv(table: &Table, filename: &Path) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::Writer::from_path(filename)?;

    if let Some(header) = table.header() {
        writer.write_record(header.cell_iter().map(|c| c.content()))?;
    }

    for row in table.row_iter() {
        writer.write_record(row.cell_iter().map(|c| c.content()))?;
    }
    writer.flush()?;

    println!("Exported to {}", filename.display());

    Ok(())
}
