use std::{
    borrow::Borrow,
    fmt::{self, Debug},
    iter::FusedIterator,
};

type Link<K, V> = Option<Box<Node<K, V>>>;

struct Node<K, V> {
    key: K,
    value: V,
    next: Link<K, V>,
}

// keyed singly linked list, newest entry at the front
pub struct SinglyLinkedList<K, V> {
    head: Link<K, V>,
    len: usize,
}

impl<K, V> SinglyLinkedList<K, V> {
    pub fn new() -> Self {
        SinglyLinkedList { head: None, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn push_front(&mut self, key: K, value: V) {
        let node = Box::new(Node {
            key,
            value,
            next: self.head.take(),
        });
        self.head = Some(node);
        self.len += 1;
    }

    pub fn clear(&mut self) {
        // unlink one node at a time, dropping a long chain in one go would recurse
        let mut cur = self.head.take();
        while let Some(mut node) = cur {
            cur = node.next.take();
        }
        self.len = 0;
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            next: self.head.as_deref(),
            len: self.len,
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.iter().find(|&(k, _)| k.borrow() == key).map(|(_, v)| v)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let node = self.find_link_mut(key)?.as_deref_mut()?;
        Some(&mut node.value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.iter().any(|(k, _)| k.borrow() == key)
    }

    /// Unlinks the first entry with this key and returns the pair.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let link = self.find_link_mut(key)?;
        let mut node = link.take()?;
        *link = node.next.take();
        self.len -= 1;
        Some((node.key, node.value))
    }

    fn find_link_mut<Q>(&mut self, key: &Q) -> Option<&mut Link<K, V>>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let mut cur = &mut self.head;
        loop {
            match cur {
                None => return None,
                Some(node) if node.key.borrow() == key => return Some(cur),
                Some(node) => cur = &mut node.next,
            }
        }
    }
}

impl<K, V> Default for SinglyLinkedList<K, V> {
    fn default() -> Self {
        SinglyLinkedList::new()
    }
}

impl<K, V> Drop for SinglyLinkedList<K, V> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K: Clone, V: Clone> Clone for SinglyLinkedList<K, V> {
    fn clone(&self) -> Self {
        let mut entries: Vec<_> = self.iter().collect();
        let mut list = SinglyLinkedList::new();
        while let Some((key, value)) = entries.pop() {
            list.push_front(key.clone(), value.clone());
        }
        list
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for SinglyLinkedList<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for SinglyLinkedList<K, V> {}

impl<K: Debug, V: Debug> Debug for SinglyLinkedList<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<K, V> FromIterator<(K, V)> for SinglyLinkedList<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut entries: Vec<_> = iter.into_iter().collect();
        let mut list = SinglyLinkedList::new();
        while let Some((key, value)) = entries.pop() {
            list.push_front(key, value);
        }
        list
    }
}

pub struct Iter<'a, K, V> {
    next: Option<&'a Node<K, V>>,
    len: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.next.as_deref();
        self.len -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<'a, K, V> IntoIterator for &'a SinglyLinkedList<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct IntoIter<K, V>(SinglyLinkedList<K, V>);

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let mut node = self.0.head.take()?;
        self.0.head = node.next.take();
        self.0.len -= 1;
        Some((node.key, node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len, Some(self.0.len))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K, V> IntoIterator for SinglyLinkedList<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self)
    }
}
