use std::{borrow::Cow, collections::HashMap};

use crate::modbus_encapsulated_interface::ReadDeviceIdentificationIdCode;

/// Identification objects in wire order. Object ids are unique.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct DeviceObjects<'a> {
    entries: Vec<(u8, Cow<'a, [u8]>)>,
}

impl<'a> DeviceObjects<'a> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Appends an object, or replaces the payload of an existing id in place.
    /// Returns the previous payload if the id was already present.
    pub fn insert(&mut self, id: u8, data: impl Into<Cow<'a, [u8]>>) -> Option<Cow<'a, [u8]>> {
        let data = data.into();
        if let Some(index) = self.entries.iter().position(|(existing, _)| *existing == id) {
            return Some(std::mem::replace(&mut self.entries[index].1, data));
        }
        self.entries.push((id, data));
        None
    }

    pub fn get(&self, id: u8) -> Option<&[u8]> {
        self.entries.iter().find(|(existing, _)| *existing == id).map(|(_, data)| data.as_ref())
    }

    pub fn contains(&self, id: u8) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, 'a> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    pub fn into_owned(self) -> DeviceObjects<'static> {
        DeviceObjects {
            entries: self.entries.into_iter().map(|(id, data)| (id, Cow::Owned(data.into_owned()))).collect(),
        }
    }
}

impl<'a, D> FromIterator<(u8, D)> for DeviceObjects<'a>
where
    D: Into<Cow<'a, [u8]>>,
{
    fn from_iter<I: IntoIterator<Item = (u8, D)>>(iter: I) -> Self {
        let mut objects = Self::new();
        for (id, data) in iter {
            objects.insert(id, data);
        }
        objects
    }
}

impl<'s, 'a> IntoIterator for &'s DeviceObjects<'a> {
    type Item = (u8, &'s [u8]);
    type IntoIter = Iter<'s, 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Objects of a [`DeviceObjects`] in wire order.
pub struct Iter<'s, 'a> {
    inner: std::slice::Iter<'s, (u8, Cow<'a, [u8]>)>,
}

impl<'s, 'a> Iterator for Iter<'s, 'a> {
    type Item = (u8, &'s [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(id, data)| (*id, data.as_ref()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/**
 * Source of the identification objects served by read device identification.
 * Handed to [`crate::ReadDeviceIdentificationRequest::execute`] by the caller,
 * so every server can answer from its own backing store.
 */
pub trait DeviceInformationProvider {
    /// Objects to answer with. Only called with a read code that passed validation.
    fn lookup(&self, read_code: ReadDeviceIdentificationIdCode, object_id: u8) -> DeviceObjects<'_>;
}

impl<T> DeviceInformationProvider for &T
where
    T: DeviceInformationProvider + ?Sized,
{
    fn lookup(&self, read_code: ReadDeviceIdentificationIdCode, object_id: u8) -> DeviceObjects<'_> {
        (**self).lookup(read_code, object_id)
    }
}

/// Identification and additional information describing a device.
#[derive(PartialEq, Debug, Clone)]
pub struct DeviceIdentification<'a> {
    pub vendor_name: Cow<'a, str>,
    pub product_code: Cow<'a, str>,
    pub major_minor_revision: Cow<'a, str>,
    pub vendor_url: Option<Cow<'a, str>>,
    pub product_name: Option<Cow<'a, str>>,
    pub model_name: Option<Cow<'a, str>>,
    pub user_application_name: Option<Cow<'a, str>>,
    /// Private objects may be optionally defined.
    /// The range [0x80 - 0xFF] is product dependant.
    pub objects: HashMap<u8, Cow<'a, [u8]>>,
}

impl<'a> DeviceIdentification<'a> {
    pub fn new(
        vendor_name: impl Into<Cow<'a, str>>,
        product_code: impl Into<Cow<'a, str>>,
        major_minor_revision: impl Into<Cow<'a, str>>,
    ) -> Self {
        Self {
            vendor_name: vendor_name.into(),
            product_code: product_code.into(),
            major_minor_revision: major_minor_revision.into(),
            vendor_url: None,
            product_name: None,
            model_name: None,
            user_application_name: None,
            objects: HashMap::new(),
        }
    }

    /// Payload of a single object id, if the device defines it.
    pub fn object(&self, id: u8) -> Option<&[u8]> {
        match id {
            0x00 => Some(self.vendor_name.as_bytes()),
            0x01 => Some(self.product_code.as_bytes()),
            0x02 => Some(self.major_minor_revision.as_bytes()),
            0x03 => Some(self.vendor_url.as_ref()?.as_bytes()),
            0x04 => Some(self.product_name.as_ref()?.as_bytes()),
            0x05 => Some(self.model_name.as_ref()?.as_bytes()),
            0x06 => Some(self.user_application_name.as_ref()?.as_bytes()),
            _ => Some(self.objects.get(&id)?.as_ref()),
        }
    }
}

impl<'a> DeviceInformationProvider for DeviceIdentification<'a> {
    fn lookup(&self, read_code: ReadDeviceIdentificationIdCode, object_id: u8) -> DeviceObjects<'_> {
        let mut objects = DeviceObjects::new();
        match read_code {
            ReadDeviceIdentificationIdCode::Individual => {
                if let Some(data) = self.object(object_id) {
                    objects.insert(object_id, data);
                }
            }
            // Reserved codes pass validation but select nothing.
            ReadDeviceIdentificationIdCode::Unknown(_) => {}
            stream => {
                let Some(end) = stream.stream_end() else {
                    return objects;
                };
                for id in object_id..=end {
                    if let Some(data) = self.object(id) {
                        objects.insert(id, data);
                    }
                }
            }
        }
        objects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device() -> DeviceIdentification<'static> {
        let mut device = DeviceIdentification::new("Vendor", "P-100", "1.2");
        device.product_name = Some("Pump".into());
        device.objects.insert(0x80, b"private".as_slice().into());
        device
    }

    #[test]
    fn insert_keeps_first_position() {
        let mut objects = DeviceObjects::new();
        objects.insert(0x02, b"c".as_slice());
        objects.insert(0x00, b"a".as_slice());
        let previous = objects.insert(0x02, b"C".as_slice());

        assert_eq!(previous.as_deref(), Some(b"c".as_slice()));
        assert_eq!(objects.len(), 2);
        assert_eq!(objects.iter().collect::<Vec<_>>(), vec![(0x02, b"C".as_slice()), (0x00, b"a".as_slice())]);
    }

    #[test]
    fn basic_stream() {
        let device = device();
        let objects = device.lookup(ReadDeviceIdentificationIdCode::Basic, 0x00);
        let ids: Vec<u8> = objects.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![0x00, 0x01, 0x02]);
        assert_eq!(objects.get(0x01), Some(b"P-100".as_slice()));
    }

    #[test]
    fn regular_stream_starts_at_object_id() {
        let device = device();
        let objects = device.lookup(ReadDeviceIdentificationIdCode::Regular, 0x02);
        let ids: Vec<u8> = objects.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![0x02, 0x04]);
    }

    #[test]
    fn extended_stream_includes_private_objects() {
        let device = device();
        let objects = device.lookup(ReadDeviceIdentificationIdCode::Extended, 0x00);
        assert_eq!(objects.len(), 5);
        assert_eq!(objects.get(0x80), Some(b"private".as_slice()));
    }

    #[test]
    fn individual_object() {
        let device = device();
        let objects = device.lookup(ReadDeviceIdentificationIdCode::Individual, 0x04);
        assert_eq!(objects.iter().collect::<Vec<_>>(), vec![(0x04, b"Pump".as_slice())]);
        assert!(device.lookup(ReadDeviceIdentificationIdCode::Individual, 0x05).is_empty());
    }

    #[test]
    fn reserved_read_code_selects_nothing() {
        let device = device();
        assert!(device.lookup(ReadDeviceIdentificationIdCode::Unknown(0x00), 0x00).is_empty());
    }
}
