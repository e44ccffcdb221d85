//! # Array Schema
//!
//! [`Array`] renders any [`Sequence`] with an element schema: text as
//! `[e1,e2,...]` in iteration order, messages as a repeated field whose
//! contents are replaced by the elements.
//!
//! Ordered containers keep their order. `HashSet` iterates in whatever
//! order its hasher yields, so its text is not stable across processes;
//! prefer `BTreeSet` where output is compared.

use std::collections::{BTreeSet, HashSet, LinkedList, VecDeque};
use std::fmt;

use jpc_core::{MessageDescriptor, ReflectMessage, ValueKind};

use crate::error::SchemaError;
use crate::message::{Leaf, MessageSchema};
use crate::text::{write_joined, TextSchema};

/// A container that lends its elements in a fixed order.
pub trait Sequence {
    type Item: ?Sized;

    type Iter<'a>: Iterator<Item = &'a Self::Item>
    where
        Self: 'a;

    fn items(&self) -> Self::Iter<'_>;
}

impl<T> Sequence for [T] {
    type Item = T;
    type Iter<'a> = std::slice::Iter<'a, T> where Self: 'a;

    fn items(&self) -> Self::Iter<'_> {
        self.iter()
    }
}

impl<T, const N: usize> Sequence for [T; N] {
    type Item = T;
    type Iter<'a> = std::slice::Iter<'a, T> where Self: 'a;

    fn items(&self) -> Self::Iter<'_> {
        self.iter()
    }
}

impl<T> Sequence for Vec<T> {
    type Item = T;
    type Iter<'a> = std::slice::Iter<'a, T> where Self: 'a;

    fn items(&self) -> Self::Iter<'_> {
        self.iter()
    }
}

impl<T> Sequence for VecDeque<T> {
    type Item = T;
    type Iter<'a> = std::collections::vec_deque::Iter<'a, T> where Self: 'a;

    fn items(&self) -> Self::Iter<'_> {
        self.iter()
    }
}

impl<T> Sequence for LinkedList<T> {
    type Item = T;
    type Iter<'a> = std::collections::linked_list::Iter<'a, T> where Self: 'a;

    fn items(&self) -> Self::Iter<'_> {
        self.iter()
    }
}

impl<T> Sequence for BTreeSet<T> {
    type Item = T;
    type Iter<'a> = std::collections::btree_set::Iter<'a, T> where Self: 'a;

    fn items(&self) -> Self::Iter<'_> {
        self.iter()
    }
}

impl<T, S> Sequence for HashSet<T, S> {
    type Item = T;
    type Iter<'a> = std::collections::hash_set::Iter<'a, T> where Self: 'a;

    fn items(&self) -> Self::Iter<'_> {
        self.iter()
    }
}

impl<C: Sequence + ?Sized> Sequence for &C {
    type Item = C::Item;
    type Iter<'a> = C::Iter<'a> where Self: 'a;

    fn items(&self) -> Self::Iter<'_> {
        (**self).items()
    }
}

impl<C: Sequence + ?Sized> Sequence for Box<C> {
    type Item = C::Item;
    type Iter<'a> = C::Iter<'a> where Self: 'a;

    fn items(&self) -> Self::Iter<'_> {
        (**self).items()
    }
}

/// Schema for sequences, rendering each element with `E`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Array<E> {
    element: E,
}

impl<E> Array<E> {
    pub fn element(&self) -> &E {
        &self.element
    }
}

pub fn array<E>(element: E) -> Array<E> {
    Array { element }
}

impl<C, E> TextSchema<C> for Array<E>
where
    C: Sequence + ?Sized,
    E: TextSchema<C::Item>,
{
    fn write_text(&self, value: &C, out: &mut dyn fmt::Write) -> fmt::Result {
        out.write_char('[')?;
        write_joined(out, value.items(), |item, out| {
            self.element.write_text(item, out)
        })?;
        out.write_char(']')
    }
}

impl<C, E, M> MessageSchema<C, M> for Array<E>
where
    C: Sequence + ?Sized,
    E: MessageSchema<C::Item, M>,
    M: ReflectMessage,
{
    fn kind(&self) -> ValueKind {
        ValueKind::repeated_of(self.element.kind())
    }

    fn to_leaf(&self, value: &C) -> Result<Leaf<M>, SchemaError> {
        let values = value
            .items()
            .map(|item| self.element.to_leaf(item))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Leaf::Repeated {
            kind: self.element.kind(),
            values,
        })
    }

    fn placeholder(&self) -> Leaf<M> {
        Leaf::Repeated {
            kind: self.element.kind(),
            values: Vec::new(),
        }
    }

    fn message_type(&self) -> Option<&MessageDescriptor> {
        self.element.message_type()
    }

    fn validate_nested(&self) -> Result<(), SchemaError> {
        self.element.validate_nested()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{number, string};
    use jpc_core::{DynamicMessage, Value};

    #[test]
    fn test_array_of_numbers() {
        assert_eq!(array(number()).to_text_string(&vec![1, 2, 3]).unwrap(), "[1,2,3]");
        assert_eq!(array(number()).to_text_string(&Vec::<i32>::new()).unwrap(), "[]");
    }

    #[test]
    fn test_containers() {
        let s = array(string());
        let set: BTreeSet<String> = ["world", "hello"].iter().map(|s| s.to_string()).collect();
        assert_eq!(s.to_text_string(&set).unwrap(), r#"["hello","world"]"#);
        let deque: VecDeque<&str> = VecDeque::from(vec!["a", "b"]);
        assert_eq!(s.to_text_string(&deque).unwrap(), r#"["a","b"]"#);
        let list: LinkedList<Box<str>> = ["x".into()].into_iter().collect();
        assert_eq!(s.to_text_string(&list).unwrap(), r#"["x"]"#);
        assert_eq!(array(number()).to_text_string(&[7u8, 8]).unwrap(), "[7,8]");
        assert_eq!(array(number()).to_text_string(&[1.5f64][..]).unwrap(), "[1.5]");
    }

    #[test]
    fn test_nested_arrays() {
        let grid = vec![vec![1, 2], vec![], vec![3]];
        assert_eq!(array(array(number())).to_text_string(&grid).unwrap(), "[[1,2],[],[3]]");
        let kind = MessageSchema::<Vec<Vec<i32>>, DynamicMessage>::kind(&array(array(number())));
        assert_eq!(kind.to_string(), "repeated repeated int32");
    }

    #[test]
    fn test_leaf_keeps_order() {
        let leaf: Leaf<DynamicMessage> = array(number()).to_leaf(&vec![3i64, 1, 2]).unwrap();
        assert_eq!(
            leaf,
            Leaf::Repeated {
                kind: ValueKind::Int64,
                values: vec![
                    Leaf::Value(Value::Int64(3)),
                    Leaf::Value(Value::Int64(1)),
                    Leaf::Value(Value::Int64(2)),
                ],
            }
        );
    }

    #[test]
    fn test_placeholder_is_empty_repeated() {
        let leaf: Leaf<DynamicMessage> = MessageSchema::<Vec<String>, _>::placeholder(&array(string()));
        assert_eq!(leaf.kind(), ValueKind::repeated_of(ValueKind::String));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::number;
    use jpc_core::DynamicMessage;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_text_is_json_with_same_elements(items in proptest::collection::vec(any::<i64>(), 0..32)) {
            let text = array(number()).to_text_string(&items).unwrap();
            let parsed: Vec<i64> = serde_json::from_str(&text).unwrap();
            prop_assert_eq!(parsed, items);
        }

        #[test]
        fn prop_leaf_has_one_value_per_element(items in proptest::collection::vec(any::<u32>(), 0..32)) {
            let leaf: Leaf<DynamicMessage> = array(number()).to_leaf(&items).unwrap();
            match leaf {
                Leaf::Repeated { values, .. } => prop_assert_eq!(values.len(), items.len()),
                other => prop_assert!(false, "expected repeated leaf, got {:?}", other),
            }
        }
    }
}
