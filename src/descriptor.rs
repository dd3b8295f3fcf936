//! Per-type field tables
//!
//! A [`MessageDescriptor`] is the generic description of one message type:
//! its name, and for each declared field, a [`FieldDescriptor`] giving the
//! field's name, field number and [`FieldKind`]. The derive macro emits the
//! field table as a `static` array and builds the descriptor around it once,
//! on first use; it is never mutated afterwards and is freely shared between
//! threads.
//!
//! Descriptors are consulted by the encoder (to walk fields in declaration
//! order), by the decoder (to route an incoming field number to a field
//! slot and check its wire type), and by the schema printer.
//!
//! A field's *slot* is its position within [`MessageDescriptor::fields`].
//! Slots are the handle by which generic code asks a [`Message`] to read or
//! write one of its fields.
//!
//! [`Message`]: crate::conv::Message

use std::collections::BTreeMap;

use crate::enumeration::EnumDescriptor;
use crate::error::DescriptorError;
use crate::wire::{ScalarKind, WireType, MAX_TAG_ID, RESERVED_TAG_IDS};

/// Category of a single (non-repeated) value
#[derive(Debug, Clone, Copy)]
pub enum ValueKind {
    Scalar(ScalarKind),
    Enum(fn() -> &'static EnumDescriptor),
    Message(fn() -> &'static MessageDescriptor),
}

impl ValueKind {
    #[must_use]
    pub const fn wire_type(&self) -> WireType {
        match self {
            ValueKind::Scalar(kind) => kind.wire_type(),
            ValueKind::Enum(_) => WireType::Varint,
            ValueKind::Message(_) => WireType::Delimited,
        }
    }
}

/// Category of a declared field
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Singular(ValueKind),
    /// Ordered sequence, carried unpacked as one tagged unit per element
    Repeated(ValueKind),
}

impl FieldKind {
    /// Wire type of each tagged unit of the field
    #[must_use]
    pub const fn wire_type(&self) -> WireType {
        match self {
            FieldKind::Singular(v) | FieldKind::Repeated(v) => v.wire_type(),
        }
    }

    #[must_use]
    pub const fn value_kind(&self) -> &ValueKind {
        match self {
            FieldKind::Singular(v) | FieldKind::Repeated(v) => v,
        }
    }

    #[must_use]
    pub const fn is_repeated(&self) -> bool {
        matches!(self, FieldKind::Repeated(_))
    }
}

/// Name, field number and category of one declared field
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    name: &'static str,
    tag_id: u32,
    kind: FieldKind,
}

impl FieldDescriptor {
    #[must_use]
    pub const fn new(name: &'static str, tag_id: u32, kind: FieldKind) -> Self {
        Self { name, tag_id, kind }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn tag_id(&self) -> u32 {
        self.tag_id
    }

    #[must_use]
    pub const fn kind(&self) -> &FieldKind {
        &self.kind
    }

    #[must_use]
    pub const fn wire_type(&self) -> WireType {
        self.kind.wire_type()
    }
}

// Field numbers below this bound are looked up by direct indexing
const DENSE_LIMIT: u32 = 64;

#[derive(Debug, Clone)]
enum SlotIndex {
    Dense(Vec<Option<usize>>),
    Sparse(BTreeMap<u32, usize>),
}

/// Field table of one message type, together with a field-number index
#[derive(Debug, Clone)]
pub struct MessageDescriptor {
    name: &'static str,
    fields: &'static [FieldDescriptor],
    index: SlotIndex,
}

impl MessageDescriptor {
    /// Validates `fields` and indexes them by field number.
    ///
    /// # Errors
    ///
    /// Returns a [`DescriptorError`] if any field number is `0`, exceeds
    /// [`MAX_TAG_ID`], falls in the reserved range `19000..=19999`, or is
    /// declared more than once.
    pub fn try_new(
        name: &'static str,
        fields: &'static [FieldDescriptor],
    ) -> Result<Self, DescriptorError> {
        let mut seen: BTreeMap<u32, usize> = BTreeMap::new();
        for (slot, field) in fields.iter().enumerate() {
            let tag_id = field.tag_id;
            if tag_id == 0 || tag_id > MAX_TAG_ID {
                return Err(DescriptorError::TagOutOfRange {
                    message: name,
                    field: field.name,
                    tag_id,
                });
            }
            if RESERVED_TAG_IDS.contains(&tag_id) {
                return Err(DescriptorError::ReservedTag {
                    message: name,
                    field: field.name,
                    tag_id,
                });
            }
            if let Some(&prior) = seen.get(&tag_id) {
                return Err(DescriptorError::DuplicateTag {
                    message: name,
                    first: fields[prior].name,
                    second: field.name,
                    tag_id,
                });
            }
            seen.insert(tag_id, slot);
        }

        let max_tag = seen.keys().next_back().copied();
        let index = match max_tag {
            Some(max) if max >= DENSE_LIMIT => SlotIndex::Sparse(seen),
            max => {
                let mut dense = vec![None; max.map_or(0, |m| m as usize + 1)];
                for (tag_id, slot) in seen {
                    dense[tag_id as usize] = Some(slot);
                }
                SlotIndex::Dense(dense)
            }
        };

        Ok(Self {
            name,
            fields,
            index,
        })
    }

    /// Infallible variant of [`MessageDescriptor::try_new`], used by derived
    /// implementations whose field tables were already validated at compile time.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions that `try_new` returns an error.
    #[must_use]
    pub fn new(name: &'static str, fields: &'static [FieldDescriptor]) -> Self {
        match Self::try_new(name, fields) {
            Ok(desc) => desc,
            Err(err) => panic!("MessageDescriptor::new: {err}"),
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Declared fields, in declaration order
    #[must_use]
    pub const fn fields(&self) -> &'static [FieldDescriptor] {
        self.fields
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Slot of the field declared with number `tag_id`, if any
    #[must_use]
    pub fn slot_of(&self, tag_id: u32) -> Option<usize> {
        match &self.index {
            SlotIndex::Dense(dense) => dense.get(tag_id as usize).copied().flatten(),
            SlotIndex::Sparse(sparse) => sparse.get(&tag_id).copied(),
        }
    }

    /// Field declared with number `tag_id`, along with its slot
    #[must_use]
    pub fn field_by_tag(&self, tag_id: u32) -> Option<(usize, &'static FieldDescriptor)> {
        let slot = self.slot_of(tag_id)?;
        Some((slot, &self.fields[slot]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STR: FieldKind = FieldKind::Singular(ValueKind::Scalar(ScalarKind::String));
    const INTS: FieldKind = FieldKind::Repeated(ValueKind::Scalar(ScalarKind::Int32));

    static GOOD: [FieldDescriptor; 3] = [
        FieldDescriptor::new("name", 1, STR),
        FieldDescriptor::new("ids", 4, INTS),
        FieldDescriptor::new("email", 3, STR),
    ];

    #[test]
    fn index_lookup() {
        let desc = MessageDescriptor::new("Person", &GOOD);
        assert_eq!(desc.name(), "Person");
        assert_eq!(desc.len(), 3);
        assert_eq!(desc.slot_of(1), Some(0));
        assert_eq!(desc.slot_of(3), Some(2));
        assert_eq!(desc.slot_of(4), Some(1));
        assert_eq!(desc.slot_of(2), None);
        assert_eq!(desc.slot_of(1000), None);
        let (slot, field) = desc.field_by_tag(4).unwrap();
        assert_eq!(slot, 1);
        assert_eq!(field.name(), "ids");
        assert!(field.kind().is_repeated());
        assert_eq!(field.wire_type(), WireType::Varint);
    }

    #[test]
    fn empty_descriptor() {
        static NONE: [FieldDescriptor; 0] = [];
        let desc = MessageDescriptor::new("Empty", &NONE);
        assert!(desc.is_empty());
        assert_eq!(desc.slot_of(1), None);
    }

    #[cfg(feature = "varint_tags")]
    #[test]
    fn sparse_index() {
        static SPARSE: [FieldDescriptor; 2] = [
            FieldDescriptor::new("a", 70_000, STR),
            FieldDescriptor::new("b", 2, STR),
        ];
        let desc = MessageDescriptor::new("Sparse", &SPARSE);
        assert_eq!(desc.slot_of(70_000), Some(0));
        assert_eq!(desc.slot_of(2), Some(1));
        assert_eq!(desc.slot_of(3), None);
    }

    #[test]
    fn rejects_bad_tables() {
        static DUP: [FieldDescriptor; 2] = [
            FieldDescriptor::new("a", 2, STR),
            FieldDescriptor::new("b", 2, STR),
        ];
        static ZERO: [FieldDescriptor; 1] = [FieldDescriptor::new("a", 0, STR)];
        static HIGH: [FieldDescriptor; 1] =
            [FieldDescriptor::new("a", MAX_TAG_ID + 1, STR)];

        assert_eq!(
            MessageDescriptor::try_new("Dup", &DUP).unwrap_err(),
            DescriptorError::DuplicateTag {
                message: "Dup",
                first: "a",
                second: "b",
                tag_id: 2
            }
        );
        assert!(matches!(
            MessageDescriptor::try_new("Zero", &ZERO),
            Err(DescriptorError::TagOutOfRange { tag_id: 0, .. })
        ));
        assert!(matches!(
            MessageDescriptor::try_new("High", &HIGH),
            Err(DescriptorError::TagOutOfRange { .. })
        ));
    }

    #[cfg(feature = "varint_tags")]
    #[test]
    fn rejects_reserved() {
        static RESERVED: [FieldDescriptor; 1] = [FieldDescriptor::new("a", 19_500, STR)];
        assert!(matches!(
            MessageDescriptor::try_new("Reserved", &RESERVED),
            Err(DescriptorError::ReservedTag { tag_id: 19_500, .. })
        ));
    }
}
