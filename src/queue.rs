use std::fmt;

/// FIFO ring buffer. Traversals schedule their whole visitation order into
/// one of these up front and the iterators drain it.
pub struct Queue<T> {
    data: *mut T,
    head: usize,
    tail: usize,
    size: usize,
    capacity: usize,
}

impl<T> Queue<T> {
    pub fn new() -> Self {
        Self {
            data: core::ptr::null_mut(),
            head: 0,
            tail: 0,
            size: 0,
            capacity: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut queue = Self::new();
        if capacity > 0 {
            queue.reallocate(capacity);
        }
        queue
    }

    pub fn enqueue(&mut self, value: T) {
        if self.size == self.capacity {
            let new_cap = if self.capacity == 0 { 4 } else { self.capacity * 2 };
            self.reallocate(new_cap);
        }
        // SAFETY: capacity > size after the check above, so the slot at tail
        // is in bounds and currently uninitialized.
        unsafe {
            core::ptr::write(self.data.add(self.tail), value);
        }
        self.tail = (self.tail + 1) % self.capacity;
        self.size += 1;
    }

    pub fn dequeue(&mut self) -> Option<T> {
        if self.size == 0 {
            return None;
        }
        // SAFETY: size > 0 implies data is non-null and data[head] holds a
        // value written by enqueue that has not been read out yet.
        let value = unsafe { core::ptr::read(self.data.add(self.head)) };
        self.head = (self.head + 1) % self.capacity;
        self.size -= 1;
        Some(value)
    }

    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    pub fn back(&self) -> Option<&T> {
        self.size.checked_sub(1).and_then(|last| self.get(last))
    }

    /// Element `offset` positions behind the front.
    pub fn get(&self, offset: usize) -> Option<&T> {
        if offset >= self.size {
            return None;
        }
        let idx = (self.head + offset) % self.capacity;
        // SAFETY: offset < size, so idx addresses an initialized element.
        unsafe { Some(&*self.data.add(idx)) }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn clear(&mut self) {
        while self.dequeue().is_some() {}
    }

    /// Iterates front to back without consuming.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            queue: self,
            offset: 0,
        }
    }

    fn reallocate(&mut self, new_cap: usize) {
        debug_assert!(new_cap >= self.size);
        let new_layout = match core::alloc::Layout::array::<T>(new_cap) {
            Ok(layout) => layout,
            Err(_) => panic!("queue capacity overflow"),
        };
        if new_layout.size() == 0 {
            // Zero-sized elements need no storage; any aligned dangling
            // pointer is valid for reads and writes of them.
            self.data = core::ptr::NonNull::<T>::dangling().as_ptr();
            self.head = 0;
            self.tail = self.size % new_cap;
            self.capacity = new_cap;
            return;
        }
        // SAFETY: layout has non-zero size.
        let new_data = unsafe { std::alloc::alloc(new_layout) as *mut T };
        if new_data.is_null() {
            std::alloc::handle_alloc_error(new_layout);
        }

        // SAFETY: every source index addresses an initialized element of the
        // old buffer and every destination index is below new_cap. Elements
        // are moved, so the old buffer is released without dropping them.
        for i in 0..self.size {
            let src_idx = (self.head + i) % self.capacity;
            unsafe {
                core::ptr::copy_nonoverlapping(self.data.add(src_idx), new_data.add(i), 1);
            }
        }
        self.release();

        self.data = new_data;
        self.head = 0;
        self.tail = self.size % new_cap;
        self.capacity = new_cap;
    }

    fn release(&mut self) {
        if self.data.is_null() || core::mem::size_of::<T>() == 0 {
            return;
        }
        if let Ok(layout) = core::alloc::Layout::array::<T>(self.capacity) {
            // SAFETY: data was allocated with exactly this layout.
            unsafe { std::alloc::dealloc(self.data as *mut u8, layout) };
        }
        self.data = core::ptr::null_mut();
    }
}

pub struct Iter<'a, T> {
    queue: &'a Queue<T>,
    offset: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let item = self.queue.get(self.offset)?;
        self.offset += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.queue.size - self.offset;
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T: Clone> Clone for Queue<T> {
    fn clone(&self) -> Self {
        let mut new_queue = Self::with_capacity(self.size);
        new_queue.extend(self.iter().cloned());
        new_queue
    }
}

impl<T: PartialEq> PartialEq for Queue<T> {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for Queue<T> {}

impl<T: fmt::Debug> fmt::Debug for Queue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Extend<T> for Queue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.enqueue(value);
        }
    }
}

impl<T> FromIterator<T> for Queue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut queue = Queue::new();
        queue.extend(iter);
        queue
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Queue<T> {
    fn drop(&mut self) {
        self.clear();
        self.release();
    }
}

// SAFETY: Queue<T> exclusively owns the buffer behind `data`.
unsafe impl<T: Send> Send for Queue<T> {}

// SAFETY: shared access only reads; mutation requires &mut Queue<T>.
unsafe impl<T: Sync> Sync for Queue<T> {}
