use alloc::vec::Vec;

use crate::{Value, error::AllocError};

/// Which container a frame holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Array,
    Object,
}

#[derive(Debug)]
pub struct Frame {
    pub value: Value,
    /// The frame holds a complete value awaiting a separator or closer.
    pub ready: bool,
}

/// LIFO of partially assembled values.
///
/// Containers are pushed open (not ready). Completed children are moved into
/// the container beneath them by [`close_array`](Self::close_array) and
/// [`close_object`](Self::close_object).
#[derive(Debug, Default)]
pub struct AssemblyStack {
    frames: Vec<Frame>,
}

impl AssemblyStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Pushes `value` as not ready.
    pub fn push(&mut self, value: Value) -> Result<(), AllocError> {
        self.push_frame(value, false)
    }

    /// Pushes a complete scalar.
    pub fn push_ready(&mut self, value: Value) -> Result<(), AllocError> {
        self.push_frame(value, true)
    }

    fn push_frame(&mut self, value: Value, ready: bool) -> Result<(), AllocError> {
        self.frames.try_reserve(1)?;
        self.frames.push(Frame { value, ready });
        Ok(())
    }

    /// Removes the top value, or returns [`Value::None`] when empty.
    pub fn pop(&mut self) -> Value {
        self.frames.pop().map_or(Value::None, |frame| frame.value)
    }

    pub fn top(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut Frame> {
        self.frames.last_mut()
    }

    pub fn below_top(&self) -> Option<&Frame> {
        self.frames.len().checked_sub(2).map(|i| &self.frames[i])
    }

    /// Container kind of the frame `depth` places below the top.
    pub fn peek_container_kind(&self, depth: usize) -> Option<ContainerKind> {
        let index = self.frames.len().checked_sub(depth + 1)?;
        match self.frames[index].value {
            Value::Array(_) => Some(ContainerKind::Array),
            Value::Object(_) => Some(ContainerKind::Object),
            _ => None,
        }
    }

    /// The next token must be an object key: the top is an open object.
    pub fn in_key_position(&self) -> bool {
        self.top().is_some_and(|frame| !frame.ready)
            && self.peek_container_kind(0) == Some(ContainerKind::Object)
    }

    /// The stack reads `[key, object]` from the top.
    pub fn awaits_name_separator(&self) -> bool {
        self.top().is_some_and(|frame| frame.value.is_string())
            && self.peek_container_kind(1) == Some(ContainerKind::Object)
    }

    /// Moves a ready top value into the array beneath it.
    ///
    /// Returns `Ok(false)` without changes when the stack does not read
    /// `[ready value, array]`.
    pub fn close_array(&mut self) -> Result<bool, AllocError> {
        if !self.top().is_some_and(|frame| frame.ready)
            || self.peek_container_kind(1) != Some(ContainerKind::Array)
        {
            return Ok(false);
        }
        let value = self.pop();
        let Some(parent) = self.frames.last_mut() else {
            return Ok(false);
        };
        if let Value::Array(seq) = &mut parent.value {
            seq.push(value)?;
            parent.ready = true;
        }
        Ok(true)
    }

    /// Moves a ready top value and the key beneath it into the object below.
    ///
    /// Returns `Ok(false)` without changes when the stack does not read
    /// `[ready value, string key, object]`.
    pub fn close_object(&mut self) -> Result<bool, AllocError> {
        let key_below = self.below_top().is_some_and(|frame| frame.value.is_string());
        if !self.top().is_some_and(|frame| frame.ready)
            || !key_below
            || self.peek_container_kind(2) != Some(ContainerKind::Object)
        {
            return Ok(false);
        }
        let value = self.pop();
        let Value::String(key) = self.pop() else {
            return Ok(false);
        };
        let Some(parent) = self.frames.last_mut() else {
            return Ok(false);
        };
        if let Value::Object(map) = &mut parent.value {
            map.set_owned(key, value)?;
            parent.ready = true;
        }
        Ok(true)
    }

    /// Exactly one frame remains and it is ready.
    pub fn is_single_ready(&self) -> bool {
        self.frames.len() == 1 && self.frames[0].ready
    }

    /// Takes the result when [`is_single_ready`](Self::is_single_ready) holds.
    pub fn take_single_ready(&mut self) -> Option<Value> {
        self.is_single_ready().then(|| self.pop())
    }

    /// Drops every partial value.
    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OrderedMap, Sequence};

    #[test]
    fn pop_on_empty_is_the_sentinel() {
        let mut stack = AssemblyStack::new();
        assert!(stack.pop().is_none());
        assert!(stack.top().is_none());
        assert!(stack.below_top().is_none());
        assert_eq!(stack.peek_container_kind(0), None);
    }

    #[test]
    fn close_array_appends_and_marks_ready() {
        let mut stack = AssemblyStack::new();
        stack.push(Value::Array(Sequence::new())).unwrap();
        assert!(!stack.close_array().unwrap());
        stack.push_ready(Value::from(1)).unwrap();
        assert!(stack.close_array().unwrap());
        assert_eq!(stack.len(), 1);
        let top = stack.top().unwrap();
        assert!(top.ready);
        assert_eq!(top.value[0], Value::from(1));
    }

    #[test]
    fn close_array_needs_a_ready_top() {
        let mut stack = AssemblyStack::new();
        stack.push(Value::Array(Sequence::new())).unwrap();
        stack.push(Value::Array(Sequence::new())).unwrap();
        assert!(!stack.close_array().unwrap());
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn close_object_sets_the_member() {
        let mut stack = AssemblyStack::new();
        stack.push(Value::Object(OrderedMap::new())).unwrap();
        assert!(stack.in_key_position());
        stack.push_ready(Value::from("k")).unwrap();
        assert!(stack.awaits_name_separator());
        assert!(!stack.close_object().unwrap());
        stack.push_ready(Value::Null).unwrap();
        assert!(!stack.close_array().unwrap());
        assert!(stack.close_object().unwrap());
        assert_eq!(stack.len(), 1);
        assert!(stack.top().unwrap().value["k"].is_null());
        assert!(!stack.in_key_position());
    }

    #[test]
    fn close_object_requires_a_string_key() {
        let mut stack = AssemblyStack::new();
        stack.push(Value::Object(OrderedMap::new())).unwrap();
        stack.push_ready(Value::from(1)).unwrap();
        stack.push_ready(Value::from(2)).unwrap();
        assert!(!stack.close_object().unwrap());
        assert_eq!(stack.len(), 3);
    }

    #[test]
    fn single_ready_result() {
        let mut stack = AssemblyStack::new();
        assert_eq!(stack.take_single_ready(), None);
        stack.push(Value::Array(Sequence::new())).unwrap();
        assert_eq!(stack.take_single_ready(), None);
        stack.top_mut().unwrap().ready = true;
        assert_eq!(
            stack.take_single_ready(),
            Some(Value::Array(Sequence::new()))
        );
        assert!(stack.is_empty());
    }
}
