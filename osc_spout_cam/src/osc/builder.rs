/// OSC packet encoding
///
/// Builders for the messages and bundles a pose sender emits. Used by test
/// senders and by tools that replay camera tracks into a running listener.

use super::packet::{padded_len, BUNDLE_TAG, IMMEDIATELY};

fn write_padded_str(buf: &mut Vec<u8>, text: &str) {
    let start = buf.len();
    buf.extend_from_slice(text.as_bytes());
    buf.resize(start + padded_len(text.len() + 1), 0);
}

/// Builder for a single OSC message
///
/// # Example
///
/// ```
/// use osc_spout_cam::oscam::osc::MessageBuilder;
///
/// let bytes = MessageBuilder::new("/proj")
///     .floats(&[1.0; 16])
///     .build();
/// assert_eq!(bytes.len() % 4, 0);
/// ```
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    address: String,
    type_tags: String,
    args: Vec<u8>,
}

impl MessageBuilder {
    /// Start a message for the given address
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            type_tags: String::from(","),
            args: Vec::new(),
        }
    }

    /// Append an int32 argument
    pub fn int(mut self, value: i32) -> Self {
        self.type_tags.push('i');
        self.args.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Append a float32 argument
    pub fn float(mut self, value: f32) -> Self {
        self.type_tags.push('f');
        self.args.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Append several float32 arguments in order
    pub fn floats(self, values: &[f32]) -> Self {
        values.iter().fold(self, |builder, &v| builder.float(v))
    }

    /// Append a string argument
    pub fn string(mut self, value: &str) -> Self {
        self.type_tags.push('s');
        write_padded_str(&mut self.args, value);
        self
    }

    /// Append a blob argument
    pub fn blob(mut self, value: &[u8]) -> Self {
        self.type_tags.push('b');
        self.args.extend_from_slice(&(value.len() as i32).to_be_bytes());
        let start = self.args.len();
        self.args.extend_from_slice(value);
        self.args.resize(start + padded_len(value.len()), 0);
        self
    }

    /// Append a payload-free argument (`T`, `F`, `N`, `I`)
    pub fn flag(mut self, tag: char) -> Self {
        self.type_tags.push(tag);
        self
    }

    /// Encode the message
    pub fn build(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(
            padded_len(self.address.len() + 1) + padded_len(self.type_tags.len() + 1) + self.args.len(),
        );
        write_padded_str(&mut buf, &self.address);
        write_padded_str(&mut buf, &self.type_tags);
        buf.extend_from_slice(&self.args);
        buf
    }
}

/// Builder for an OSC bundle of already-encoded packets
#[derive(Debug, Clone)]
pub struct BundleBuilder {
    time_tag: u64,
    elements: Vec<Vec<u8>>,
}

impl Default for BundleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BundleBuilder {
    /// Start an immediate bundle
    pub fn new() -> Self {
        Self {
            time_tag: IMMEDIATELY,
            elements: Vec::new(),
        }
    }

    /// Set the NTP time tag
    pub fn time_tag(mut self, time_tag: u64) -> Self {
        self.time_tag = time_tag;
        self
    }

    /// Append an encoded packet (message or bundle)
    pub fn packet(mut self, packet: Vec<u8>) -> Self {
        self.elements.push(packet);
        self
    }

    /// Encode the bundle
    pub fn build(&self) -> Vec<u8> {
        let body: usize = self.elements.iter().map(|e| 4 + e.len()).sum();
        let mut buf = Vec::with_capacity(BUNDLE_TAG.len() + 8 + body);
        buf.extend_from_slice(BUNDLE_TAG);
        buf.extend_from_slice(&self.time_tag.to_be_bytes());
        for element in &self.elements {
            buf.extend_from_slice(&(element.len() as i32).to_be_bytes());
            buf.extend_from_slice(element);
        }
        buf
    }
}
