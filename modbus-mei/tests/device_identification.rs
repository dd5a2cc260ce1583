use std::collections::HashMap;

use bytes::BytesMut;
use modbus_mei::{
    handle_request, parse_read_device_identification, read_rtu_frame, Decodable, DeviceIdentification, DeviceInformationProvider, DeviceObjects,
    Encodable, FunctionCode, ModbusException, Pdu, ReadDeviceIdentificationIdCode, ReadDeviceIdentificationRequest, ReadDeviceIdentificationResponse,
    ResponseError,
};

fn device_info() -> DeviceIdentification<'static> {
    DeviceIdentification {
        vendor_name: "Test".into(),
        product_code: "T-1".into(),
        major_minor_revision: "2.0".into(),
        vendor_url: Some("https://example.com".into()),
        product_name: None,
        model_name: None,
        user_application_name: None,
        objects: HashMap::from([(0x80, b"serial".as_slice().into())]),
    }
}

/// Frames a PDU the way a serial line carries it, with a placeholder CRC.
fn rtu_frame(unit_id: u8, pdu: &Pdu) -> Vec<u8> {
    let mut frame = vec![unit_id];
    frame.extend(pdu.encode_to_bytes().unwrap());
    frame.extend([0x00, 0x00]);
    frame
}

#[tokio::test]
pub async fn request_to_rtu_frame_and_back() {
    let device = device_info();

    let req = ReadDeviceIdentificationRequest::new(ReadDeviceIdentificationIdCode::Extended, 0x00);
    let req_bytes = Pdu::try_from(&req).unwrap().encode_to_bytes().unwrap();
    assert_eq!(req_bytes, vec![0x2B, 0x0E, 0x03, 0x00]);

    let res_pdu = handle_request(&Pdu::decode_from_bytes(&req_bytes).unwrap(), &device);
    let frame = rtu_frame(0x11, &res_pdu);

    let mut input = frame.as_slice();
    let mut buffer = BytesMut::new();
    let received = read_rtu_frame(&mut input, &mut buffer).await.unwrap().unwrap();
    assert_eq!(&received[..], frame.as_slice());

    let pdu = Pdu::decode_from_bytes(&received[1..received.len() - 2]).unwrap();
    let res = parse_read_device_identification(&pdu).unwrap();

    assert_eq!(res.device_id_code, ReadDeviceIdentificationIdCode::Extended);
    assert_eq!(
        res.objects.iter().collect::<Vec<_>>(),
        vec![
            (0x00, b"Test".as_slice()),
            (0x01, b"T-1".as_slice()),
            (0x02, b"2.0".as_slice()),
            (0x03, b"https://example.com".as_slice()),
            (0x80, b"serial".as_slice()),
        ]
    );
}

#[tokio::test]
pub async fn exception_response_for_illegal_read_code() {
    let device = device_info();
    let res_pdu = handle_request(&Pdu::decode_from_bytes(&[0x2B, 0x0E, 0x05, 0x00]).unwrap(), &device);
    assert_eq!(
        parse_read_device_identification(&res_pdu),
        Err(ResponseError::Exception(ModbusException::IllegalDataValue))
    );
}

#[test]
fn estimate_converges_on_every_prefix() {
    let device = device_info();
    let req = ReadDeviceIdentificationRequest::new(ReadDeviceIdentificationIdCode::Regular, 0x00);
    let res = req.execute(&device).unwrap();
    let pdu = Pdu {
        function_code: FunctionCode::ModbusEncapsulatedInterface,
        body: res.encode_to_bytes().unwrap(),
    };
    let frame = rtu_frame(0x01, &pdu);

    let estimates: Vec<usize> = (0..=frame.len())
        .map(|end| ReadDeviceIdentificationResponse::estimate_frame_size(&frame[..end]))
        .collect();

    assert!(estimates.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(estimates[5], 10);
    assert_eq!(*estimates.last().unwrap(), frame.len());
}

struct Recording {
    calls: std::cell::RefCell<Vec<(u8, u8)>>,
}

impl DeviceInformationProvider for Recording {
    fn lookup(&self, read_code: ReadDeviceIdentificationIdCode, object_id: u8) -> DeviceObjects<'_> {
        self.calls.borrow_mut().push((read_code.into(), object_id));
        DeviceObjects::new()
    }
}

#[test]
fn provider_only_sees_valid_requests() {
    let provider = Recording {
        calls: Default::default(),
    };

    let rejected = ReadDeviceIdentificationRequest::decode_from_bytes(&[0x0E, 0x05, 0x07]).unwrap();
    assert_eq!(rejected.execute(&provider), Err(ModbusException::IllegalDataValue));

    let accepted = ReadDeviceIdentificationRequest::decode_from_bytes(&[0x0E, 0x04, 0x07]).unwrap();
    let res = accepted.execute(&provider).unwrap();
    assert!(res.objects.is_empty());
    assert_eq!(res.encode_to_bytes().unwrap(), vec![0x0E, 0x04, 0x83, 0x00, 0x00, 0x00]);

    assert_eq!(*provider.calls.borrow(), vec![(0x04, 0x07)]);
}
