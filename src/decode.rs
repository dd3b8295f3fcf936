//! Message decoder
//!
//! Decoding a message consumes tagged units from a [`Cursor`] until the
//! cursor is exhausted. Each unit's field number is routed through the
//! message's descriptor to a slot, the unit's wire type is checked against
//! the field's declared category, and the payload is handed to the field:
//!
//!   * singular scalars and enumerations take the last value seen;
//!   * singular nested messages merge with whatever was decoded before;
//!   * repeated fields append, preserving wire order.
//!
//! Fields that are declared but absent from the input keep their default
//! values. Field numbers the message does not declare are handled according
//! to [`UnknownFieldPolicy`]: by default their payload is skipped, according
//! to its wire type, and the field is reported to a [`Diagnostics`] sink.
//!
//! Nested messages are decoded from a sub-cursor bounded by their length
//! prefix, so they can never consume bytes belonging to their parent. Nesting
//! depth is limited by [`DecodeConfig::max_depth`].

use crate::conv::{Message, Value};
use crate::parse::error::ProtocolViolation;
use crate::parse::{Cursor, ParseResult};
use crate::prim::{read_varint, skip_value};
use crate::wire::{Tag, WireType};

/// Default limit on message nesting depth
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Treatment of field numbers that the target message does not declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownFieldPolicy {
    /// Skip the payload and report the field to the [`Diagnostics`] sink
    #[default]
    Skip,
    /// Fail with [`ProtocolViolation::UnknownField`]
    Reject,
}

/// Caller-tunable limits and policies for decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeConfig {
    max_depth: usize,
    unknown_fields: UnknownFieldPolicy,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DecodeConfig {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            unknown_fields: UnknownFieldPolicy::Skip,
        }
    }

    /// Sets the number of nested messages that may be entered below the
    /// top-level message.
    #[must_use]
    pub const fn with_max_depth(self, max_depth: usize) -> Self {
        Self { max_depth, ..self }
    }

    #[must_use]
    pub const fn with_unknown_fields(self, unknown_fields: UnknownFieldPolicy) -> Self {
        Self {
            unknown_fields,
            ..self
        }
    }

    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    #[must_use]
    pub const fn unknown_fields(&self) -> UnknownFieldPolicy {
        self.unknown_fields
    }
}

/// Record of a field that was skipped because its number was not declared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownField {
    /// Name of the message being decoded
    pub message: &'static str,
    pub tag_id: u32,
    pub wire_type: WireType,
    /// Absolute offset of the field's tag
    pub offset: usize,
}

/// Sink for non-fatal observations made while decoding
pub trait Diagnostics {
    fn unknown_field(&mut self, field: &UnknownField);
}

/// Reports unknown fields through the `log` facade, at `debug` level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn unknown_field(&mut self, field: &UnknownField) {
        log::debug!(
            "skipping unknown field {} ({}) of `{}` at byte {}",
            field.tag_id,
            field.wire_type,
            field.message,
            field.offset
        );
    }
}

/// Accumulates unknown fields, in the order encountered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectDiagnostics(pub Vec<UnknownField>);

impl Diagnostics for CollectDiagnostics {
    fn unknown_field(&mut self, field: &UnknownField) {
        self.0.push(*field);
    }
}

impl<F: FnMut(&UnknownField)> Diagnostics for F {
    fn unknown_field(&mut self, field: &UnknownField) {
        self(field)
    }
}

/// State threaded through one top-level decode and all of its nested decodes
pub struct DecodeContext<'d> {
    config: &'d DecodeConfig,
    depth: usize,
    diagnostics: &'d mut dyn Diagnostics,
}

impl<'d> DecodeContext<'d> {
    pub fn new(config: &'d DecodeConfig, diagnostics: &'d mut dyn Diagnostics) -> Self {
        Self {
            config,
            depth: 0,
            diagnostics,
        }
    }

    #[must_use]
    pub fn config(&self) -> &DecodeConfig {
        self.config
    }

    /// Number of nested messages currently entered
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn descend(&mut self) -> ParseResult<()> {
        if self.depth >= self.config.max_depth {
            return Err(ProtocolViolation::RecursionLimit {
                limit: self.config.max_depth,
            }
            .into());
        }
        self.depth += 1;
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth -= 1;
    }

    fn unknown_field<'a>(
        &mut self,
        message: &'static str,
        tag: Tag,
        offset: usize,
        cur: Cursor<'a>,
    ) -> ParseResult<Cursor<'a>> {
        match self.config.unknown_fields {
            UnknownFieldPolicy::Reject => Err(ProtocolViolation::UnknownField {
                message,
                tag_id: tag.id(),
            }
            .into()),
            UnknownFieldPolicy::Skip => {
                self.diagnostics.unknown_field(&UnknownField {
                    message,
                    tag_id: tag.id(),
                    wire_type: tag.wire_type(),
                    offset,
                });
                skip_value(tag.wire_type(), cur)
            }
        }
    }
}

impl std::fmt::Debug for DecodeContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodeContext")
            .field("config", self.config)
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

/// Decodes a complete message of type `M` from `bytes`.
///
/// # Errors
///
/// Returns the first [`ParseError`](crate::parse::ParseError) encountered.
pub fn decode<M: Message>(
    bytes: &[u8],
    config: &DecodeConfig,
    diagnostics: &mut dyn Diagnostics,
) -> ParseResult<M> {
    let mut msg = M::default();
    let mut ctx = DecodeContext::new(config, diagnostics);
    match merge_message(&mut msg, Cursor::new(bytes), &mut ctx) {
        Ok(_) => {
            log::trace!(
                "decoded `{}` from {} bytes",
                M::descriptor().name(),
                bytes.len()
            );
            Ok(msg)
        }
        Err(err) => {
            log::trace!("failed to decode `{}`: {err}", M::descriptor().name());
            Err(err)
        }
    }
}

/// Consumes tagged units from `cur` into `msg` until `cur` is exhausted.
pub fn merge_message<'a, M: Message>(
    msg: &mut M,
    cur: Cursor<'a>,
    ctx: &mut DecodeContext<'_>,
) -> ParseResult<Cursor<'a>> {
    let desc = M::descriptor();
    let mut cur = cur;
    while !cur.is_empty() {
        let offset = cur.offset();
        let (tag, rest) = Tag::read(cur)?;
        cur = match desc.field_by_tag(tag.id()) {
            Some((slot, field)) => {
                if field.wire_type() != tag.wire_type() {
                    return Err(ProtocolViolation::WireTypeMismatch {
                        message: desc.name(),
                        field: field.name(),
                        expected: field.wire_type(),
                        actual: tag.wire_type(),
                    }
                    .into());
                }
                msg.merge_slot(slot, rest, ctx)?
            }
            None => ctx.unknown_field(desc.name(), tag, offset, rest)?,
        };
    }
    Ok(cur)
}

/// Consumes a length prefix and decodes exactly that many bytes into `msg`,
/// returning the cursor positioned after them.
///
/// # Errors
///
/// Besides any error raised while decoding the nested fields, fails with
/// [`TruncatedInput`](crate::parse::error::TruncatedInput) if the length
/// prefix overruns `cur`, and with [`ProtocolViolation::RecursionLimit`] if
/// the nesting limit is exceeded.
///
/// The nested fields are read until the length-prefixed slice is exhausted,
/// so a unit straddling its end surfaces as a truncation within the slice.
pub fn merge_nested<'a, M: Message>(
    msg: &mut M,
    cur: Cursor<'a>,
    ctx: &mut DecodeContext<'_>,
) -> ParseResult<Cursor<'a>> {
    let (len, cur) = read_varint(cur)?;
    let (sub, rest) = cur.split(len)?;
    ctx.descend()?;
    let result = merge_message(msg, sub, ctx);
    ctx.ascend();
    result?;
    Ok(rest)
}

/// Reads a message-typed value from a length-delimited payload.
pub fn read_nested<'a, M: Message>(
    cur: Cursor<'a>,
    ctx: &mut DecodeContext<'_>,
) -> ParseResult<(M, Cursor<'a>)> {
    let mut msg = M::default();
    let rest = merge_nested(&mut msg, cur, ctx)?;
    Ok((msg, rest))
}

/// Folds one payload into a singular field.
#[inline]
pub fn merge_singular<'a, T: Value>(
    val: &mut T,
    cur: Cursor<'a>,
    ctx: &mut DecodeContext<'_>,
) -> ParseResult<Cursor<'a>> {
    val.merge_value(cur, ctx)
}

/// Appends one payload to a repeated field.
pub fn merge_repeated<'a, T: Value>(
    vals: &mut Vec<T>,
    cur: Cursor<'a>,
    ctx: &mut DecodeContext<'_>,
) -> ParseResult<Cursor<'a>> {
    let (val, rest) = T::read_value(cur, ctx)?;
    vals.push(val);
    Ok(rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{FieldDescriptor, MessageDescriptor};
    use crate::hex;
    use crate::parse::error::{InternalError, TruncatedInput};
    use crate::parse::ParseError;
    use crate::prelude::*;

    #[derive(Message, Default, Debug, Clone, PartialEq)]
    struct Leaf {
        #[proto(tag = 1)]
        name: String,
        #[proto(tag = 2)]
        count: u32,
    }

    #[derive(Message, Default, Debug, Clone, PartialEq)]
    struct Branch {
        #[proto(tag = 1)]
        label: String,
        #[proto(tag = 2)]
        leaf: Leaf,
        #[proto(tag = 3)]
        leaves: Vec<Leaf>,
    }

    #[derive(Message, Default, Debug, Clone, PartialEq)]
    struct Chain {
        #[proto(tag = 1)]
        next: Option<Box<Chain>>,
        #[proto(tag = 2)]
        depth: u32,
    }

    #[test]
    fn missing_fields_default() {
        let leaf = Leaf::decode(&hex!("1007")).unwrap();
        assert_eq!(
            leaf,
            Leaf {
                name: String::new(),
                count: 7
            }
        );
        assert_eq!(Leaf::decode(&[]).unwrap(), Leaf::default());
    }

    #[test]
    fn last_scalar_wins_and_messages_merge() {
        // leaf{name:"a"}, leaf{count:3}, label:"x", label:"y"
        let bytes = hex!("1203 0a0161 1202 1003 0a0178 0a0179");
        let branch = Branch::decode(&bytes).unwrap();
        assert_eq!(branch.label, "y");
        assert_eq!(
            branch.leaf,
            Leaf {
                name: "a".to_owned(),
                count: 3
            }
        );
    }

    #[test]
    fn repeated_preserves_order() {
        let leaves = vec![
            Leaf {
                name: "bloaty".to_owned(),
                count: 0,
            },
            Leaf {
                name: "bloatz".to_owned(),
                count: 1,
            },
        ];
        let branch = Branch {
            leaves: leaves.clone(),
            ..Default::default()
        };
        let back = Branch::decode(&branch.encode()).unwrap();
        assert_eq!(back.leaves, leaves);
    }

    #[test]
    fn unknown_fields_skipped() {
        // field 7 of each wire type, then count = 5
        let bytes = hex!("3896 01 39 0102030405060708 3a 03 616263 3d 01020304 1005");
        let mut seen = CollectDiagnostics::default();
        let leaf: Leaf = decode(&bytes, &DecodeConfig::default(), &mut seen).unwrap();
        assert_eq!(leaf.count, 5);
        assert_eq!(
            seen.0.iter().map(|f| f.wire_type).collect::<Vec<_>>(),
            vec![
                WireType::Varint,
                WireType::Fixed64,
                WireType::Delimited,
                WireType::Fixed32
            ]
        );
        assert!(seen.0.iter().all(|f| f.tag_id == 7 && f.message == "Leaf"));
        assert_eq!(seen.0[1].offset, 3);

        let mut count = 0;
        let mut counter = |_: &UnknownField| count += 1;
        let leaf: Leaf = decode(&bytes, &DecodeConfig::default(), &mut counter).unwrap();
        assert_eq!(leaf.count, 5);
        assert_eq!(count, 4);
    }

    #[test]
    fn unknown_fields_rejected() {
        let config = DecodeConfig::new().with_unknown_fields(UnknownFieldPolicy::Reject);
        let err = Leaf::decode_with(&hex!("3801 1005"), &config, &mut LogDiagnostics).unwrap_err();
        assert_eq!(
            err,
            ParseError::Violation(ProtocolViolation::UnknownField {
                message: "Leaf",
                tag_id: 7
            })
        );
    }

    #[test]
    fn wire_type_mismatch() {
        // name (field 1) sent as a varint
        let err = Leaf::decode(&hex!("0801")).unwrap_err();
        assert_eq!(
            err,
            ParseError::Violation(ProtocolViolation::WireTypeMismatch {
                message: "Leaf",
                field: "name",
                expected: WireType::Delimited,
                actual: WireType::Varint,
            })
        );
    }

    #[test]
    fn nested_is_bounded() {
        // leaf declares 2 bytes but its field claims 3
        let err = Branch::decode(&hex!("1202 0a03 616263")).unwrap_err();
        assert_eq!(
            err,
            ParseError::Truncated(TruncatedInput {
                offset: 4,
                requested: 3,
                available: 0,
            })
        );

        // the field after a nested message is read from the parent
        let branch = Branch::decode(&hex!("1203 0a0161 0a0178")).unwrap();
        assert_eq!(branch.leaf.name, "a");
        assert_eq!(branch.label, "x");

        // leaf length overruns the buffer
        let err = Branch::decode(&hex!("1209 0a0161")).unwrap_err();
        assert!(err.is_truncated());
    }

    #[test]
    fn truncated_inputs() {
        assert!(Leaf::decode(&hex!("10")).unwrap_err().is_truncated());
        assert!(Leaf::decode(&hex!("1096")).unwrap_err().is_truncated());
        assert!(Leaf::decode(&hex!("0a05776f72")).unwrap_err().is_truncated());
    }

    #[test]
    fn recursion_limit() {
        let mut chain = Chain {
            next: None,
            depth: 1,
        };
        for depth in 2..=5 {
            chain = Chain {
                next: Some(Box::new(chain)),
                depth,
            };
        }
        let bytes = chain.encode();
        assert_eq!(Chain::decode(&bytes).unwrap(), chain);

        // four links below the top-level message
        let shallow = DecodeConfig::new().with_max_depth(2);
        let err = Chain::decode_with(&bytes, &shallow, &mut LogDiagnostics).unwrap_err();
        assert_eq!(
            err,
            ParseError::Violation(ProtocolViolation::RecursionLimit { limit: 2 })
        );
        let exact = DecodeConfig::new().with_max_depth(4);
        assert!(Chain::decode_with(&bytes, &exact, &mut LogDiagnostics).is_ok());
    }

    #[derive(Default, Debug)]
    struct Manual {
        id: u64,
    }

    static MANUAL_FIELDS: [FieldDescriptor; 1] = [FieldDescriptor::new(
        "id",
        1,
        <u64 as crate::conv::Field>::KIND,
    )];

    crate::lazy_static! {
        static ref MANUAL: MessageDescriptor = MessageDescriptor::new("Manual", &MANUAL_FIELDS);
    }

    impl Message for Manual {
        fn descriptor() -> &'static MessageDescriptor {
            &*MANUAL
        }

        fn write_slot<U: crate::conv::target::Target>(&self, slot: usize, buf: &mut U) -> usize {
            match slot {
                0 => crate::conv::Field::encode_field(&self.id, 1, buf),
                _ => 0,
            }
        }

        // Deliberately out of step with the descriptor
        fn merge_slot<'a>(
            &mut self,
            slot: usize,
            _: Cursor<'a>,
            _: &mut DecodeContext<'_>,
        ) -> ParseResult<Cursor<'a>> {
            Err(InternalError::UnknownSlot {
                message: "Manual",
                slot,
            }
            .into())
        }
    }

    #[test]
    fn hand_written_message() {
        let msg = Manual { id: 300 };
        assert_eq!(msg.encode(), hex!("08ac02"));
        assert_eq!(
            Manual::decode(&hex!("08ac02")).unwrap_err(),
            ParseError::Internal(InternalError::UnknownSlot {
                message: "Manual",
                slot: 0
            })
        );
    }
}
