use crate::class::ClassHandle;
use std::ops::Index;

/// A fixed-length array handed to host APIs.
///
/// The length is set at construction and never changes.
#[derive(Debug, Clone)]
pub struct HostArray<T> {
    component: ClassHandle,
    elements: Box<[T]>,
}

impl<T> HostArray<T> {
    /// Builds an array of exactly `elements.len()` slots, preserving order.
    pub fn from_vec(component: ClassHandle, elements: Vec<T>) -> Self {
        HostArray {
            component,
            elements: elements.into_boxed_slice(),
        }
    }

    pub fn component(&self) -> &ClassHandle {
        &self.component
    }

    pub fn descriptor(&self) -> String {
        self.component.array_descriptor()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.elements.get(index)
    }

    /// Replaces the element at `index`, returning the old one. Out of range is `None`.
    pub fn set(&mut self, index: usize, value: T) -> Option<T> {
        let slot = self.elements.get_mut(index)?;
        Some(std::mem::replace(slot, value))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    pub fn into_vec(self) -> Vec<T> {
        self.elements.into_vec()
    }
}

impl<T> Index<usize> for HostArray<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.elements[index]
    }
}

impl<'a, T> IntoIterator for &'a HostArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stdlib;

    #[test]
    fn length_is_fixed_and_set_stays_in_bounds() {
        let mut array = HostArray::from_vec(stdlib::integer(), vec![1, 2, 3]);
        assert_eq!(array.len(), 3);
        assert_eq!(array.set(1, 20), Some(2));
        assert_eq!(array.set(3, 40), None);
        assert_eq!(array.as_slice(), &[1, 20, 3]);
        assert_eq!(array.descriptor(), "[Ljava/lang/Integer;");
    }
}
