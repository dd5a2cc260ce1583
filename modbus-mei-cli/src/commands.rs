use std::{borrow::Cow, error::Error};

use bytes::BytesMut;
use modbus_mei::{
    parse_read_device_identification, read_rtu_frame, Decodable, DeviceIdentification, Encodable, Pdu, ReadDeviceIdentificationRequest,
    ReadDeviceIdentificationResponse,
};
use tracing::{debug, warn};

use crate::{
    args::*,
    table::{export_csv, objects_table, print_response},
};

pub async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Commands::Request(args) => request(&args),
        Commands::DecodeRequest(args) => decode_request(&args),
        Commands::Decode(args) => decode(&args),
        Commands::Estimate(args) => estimate(&args),
        Commands::Identify(args) => identify(&args),
        Commands::Stream => stream().await,
    }
}

fn parse_hex(args: &HexArgs) -> Result<Vec<u8>, Box<dyn Error>> {
    let joined: String = args.hex.iter().flat_map(|part| part.chars()).filter(|c| !c.is_whitespace()).collect();
    let digits = joined.strip_prefix("0x").unwrap_or(&joined);
    Ok(hex::decode(digits)?)
}

fn build_request(args: &RequestArgs) -> Result<ReadDeviceIdentificationRequest, Box<dyn Error>> {
    Ok(ReadDeviceIdentificationRequest::from_values(args.read_code, args.object_id)?)
}

fn request(args: &RequestArgs) -> Result<(), Box<dyn Error>> {
    let req = build_request(args)?;
    println!("{}", hex::encode(req.encode_to_bytes()?));
    Ok(())
}

fn decode_request(args: &HexArgs) -> Result<(), Box<dyn Error>> {
    let req = ReadDeviceIdentificationRequest::decode_from_bytes(&parse_hex(args)?)?;
    println!(
        "mei type {:#04x}, read code {:#04x}, object id {:#04x}",
        u8::from(req.kind),
        u8::from(req.device_id_code),
        req.object_id
    );
    Ok(())
}

fn decode(args: &DecodeArgs) -> Result<(), Box<dyn Error>> {
    let res = ReadDeviceIdentificationResponse::decode_from_bytes(&parse_hex(&args.input)?)?;
    print_response(&res);
    if let Some(filename) = &args.export {
        export_csv(&objects_table(&res), filename)?;
    }
    Ok(())
}

fn estimate(args: &HexArgs) -> Result<(), Box<dyn Error>> {
    let data = parse_hex(args)?;
    let frame_size = ReadDeviceIdentificationResponse::estimate_frame_size(&data);
    println!("{frame_size}");
    if data.len() < frame_size {
        println!("{} more bytes expected", frame_size - data.len());
    }
    Ok(())
}

fn identify(args: &IdentifyArgs) -> Result<(), Box<dyn Error>> {
    let mut device = DeviceIdentification::new(args.vendor_name.as_str(), args.product_code.as_str(), args.revision.as_str());
    device.vendor_url = args.vendor_url.as_deref().map(Cow::Borrowed);
    device.product_name = args.product_name.as_deref().map(Cow::Borrowed);
    device.model_name = args.model_name.as_deref().map(Cow::Borrowed);
    device.user_application_name = args.user_application_name.as_deref().map(Cow::Borrowed);
    for (id, value) in &args.objects {
        device.objects.insert(*id, value.as_bytes().into());
    }

    let req = build_request(&args.request)?;
    let res = req.execute(&device)?;
    println!("{}", hex::encode(res.encode_to_bytes()?));
    print_response(&res);

    if let Some(filename) = &args.export {
        export_csv(&objects_table(&res), filename)?;
    }
    Ok(())
}

async fn stream() -> Result<(), Box<dyn Error>> {
    let mut stdin = tokio::io::stdin();
    let mut buffer = BytesMut::with_capacity(256);

    while let Some(frame) = read_rtu_frame(&mut stdin, &mut buffer).await? {
        println!("{}", hex::encode(&frame));
        // Address byte in front, CRC behind.
        let pdu = Pdu::decode_from_bytes(&frame[1..frame.len() - 2])?;
        match parse_read_device_identification(&pdu) {
            Ok(res) => print_response(&res),
            Err(err) => warn!(%err, unit = frame[0], "skipping frame"),
        }
    }

    debug!("end of input");
    Ok(())
}
