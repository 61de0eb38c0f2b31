//! Handles, the boxable stand-in for pointers
//!
//! Rather than boxing memory addresses a boxed pointer carries a [`Handle`] into a
//! [`HandleTable`] owned by the host. A handle is 48 bits, a 32 bit slot index and a 16 bit
//! generation, so it fills the payload of the pointer stencils exactly. Lookups are bounds and
//! liveness checked, a handle to a removed value is reported as [`HandleError::Stale`] even
//! after its slot has been reused.
//!
//! ```rust
//! # use nanword::{Handle, HandleTable, Word};
//! let mut table = HandleTable::new();
//! let handle = table.insert(String::from("This is a test")).unwrap();
//!
//! let word = Word::from(handle);
//! assert!(word.is_boxed());
//!
//! let handle = word.downcast::<Handle>().unwrap();
//! assert_eq!(table.get(handle).unwrap(), "This is a test");
//! ```
//!
//! A [`ConstHandle`] is the read-only variant, boxed with the const pointer stencil. It's
//! obtained from [`Handle::as_const`] or from interning a value into a [`ConstPool`].

use std::error;
use std::fmt::{self, Debug, Display};
use std::hash::Hash;

use fxhash::FxHashMap as HashMap;
use tracing::{debug, trace};


const INDEX_BITS: u32 = 32;


/// Mutable reference into a [`HandleTable`]
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle {
    index: u32,
    generation: u16,
}

/// Read-only reference into a [`HandleTable`] or a [`ConstPool`]
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstHandle {
    index: u32,
    generation: u16,
}

impl Handle {
    pub const fn index(self) -> u32 {
        self.index
    }

    pub const fn generation(self) -> u16 {
        self.generation
    }

    /// Demotes the handle to a read-only one referring to the same slot
    pub const fn as_const(self) -> ConstHandle {
        ConstHandle {
            index: self.index,
            generation: self.generation,
        }
    }

    /// Only use for Primitive conversions
    pub(crate) const fn to_bits(self) -> u64 {
        pack(self.index, self.generation)
    }

    /// Only use for Primitive conversions
    pub(crate) const fn from_bits(bits: u64) -> Handle {
        let (index, generation) = unpack(bits);
        Handle { index, generation }
    }
}

impl ConstHandle {
    pub const fn index(self) -> u32 {
        self.index
    }

    pub const fn generation(self) -> u16 {
        self.generation
    }

    /// Only use for Primitive conversions
    pub(crate) const fn to_bits(self) -> u64 {
        pack(self.index, self.generation)
    }

    /// Only use for Primitive conversions
    pub(crate) const fn from_bits(bits: u64) -> ConstHandle {
        let (index, generation) = unpack(bits);
        ConstHandle { index, generation }
    }
}

const fn pack(index: u32, generation: u16) -> u64 {
    ((generation as u64) << INDEX_BITS) | index as u64
}

const fn unpack(bits: u64) -> (u32, u16) {
    (bits as u32, (bits >> INDEX_BITS) as u16)
}

impl From<Handle> for ConstHandle {
    fn from(handle: Handle) -> Self {
        handle.as_const()
    }
}

impl Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}v{})", self.index, self.generation)
    }
}

impl Debug for ConstHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConstHandle({}v{})", self.index, self.generation)
    }
}


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandleError {
    /// The index is past the end of the table, the handle came from somewhere else
    OutOfBounds { index: u32 },
    /// The value the handle referred to has been removed
    Stale { index: u32, generation: u16 },
    /// All `u32::MAX + 1` slots are taken
    TableFull,
}

impl Display for HandleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleError::OutOfBounds { index } => write!(f, "handle index {} out of bounds", index),
            HandleError::Stale { index, generation } => {
                write!(f, "stale handle {}v{}, the value has been removed", index, generation)
            },
            HandleError::TableFull => f.write_str("handle table is full"),
        }
    }
}

impl error::Error for HandleError {}


struct Slot<T> {
    generation: u16,
    value: Option<T>,
}

/// Slot arena handing out generation checked [`Handle`]s
///
/// Removing a value bumps the generation of its slot before the slot gets reused. A slot whose
/// generation would wrap around is retired for good, so a stale handle can never alias a newer
/// value.
pub struct HandleTable<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Default for HandleTable<T> {
    fn default() -> Self {
        HandleTable::new()
    }
}

impl<T> HandleTable<T> {
    pub fn new() -> HandleTable<T> {
        HandleTable {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> HandleTable<T> {
        HandleTable {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of live values
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, value: T) -> Result<Handle, HandleError> {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                let index = u32::try_from(self.slots.len()).map_err(|_| HandleError::TableFull)?;
                self.slots.push(Slot { generation: 0, value: None });
                index
            },
        };

        let slot = &mut self.slots[index as usize];
        debug_assert!(slot.value.is_none(), "BUG: free list points at an occupied slot");
        slot.value = Some(value);
        self.len += 1;

        let handle = Handle { index, generation: slot.generation };
        trace!(?handle, "insert");
        Ok(handle)
    }

    pub fn get(&self, handle: Handle) -> Result<&T, HandleError> {
        self.lookup(handle.index, handle.generation)
    }

    pub fn get_const(&self, handle: ConstHandle) -> Result<&T, HandleError> {
        self.lookup(handle.index, handle.generation)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Result<&mut T, HandleError> {
        let Handle { index, generation } = handle;
        let slot = self.slots
            .get_mut(index as usize)
            .ok_or(HandleError::OutOfBounds { index })?;

        if slot.generation != generation {
            return Err(HandleError::Stale { index, generation });
        }
        slot.value
            .as_mut()
            .ok_or(HandleError::Stale { index, generation })
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.get(handle).is_ok()
    }

    pub fn remove(&mut self, handle: Handle) -> Result<T, HandleError> {
        let Handle { index, generation } = handle;
        let slot = self.slots
            .get_mut(index as usize)
            .ok_or(HandleError::OutOfBounds { index })?;

        if slot.generation != generation {
            return Err(HandleError::Stale { index, generation });
        }
        let value = slot.value
            .take()
            .ok_or(HandleError::Stale { index, generation })?;
        self.len -= 1;

        match slot.generation.checked_add(1) {
            Some(next) => {
                slot.generation = next;
                self.free.push(index);
            },
            None => debug!(index, "retiring slot with exhausted generation"),
        }

        trace!(?handle, "remove");
        Ok(value)
    }

    /// Iterates over live values in slot order
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> + '_ {
        self.slots.iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                let value = slot.value.as_ref()?;
                let handle = Handle {
                    index: index as u32,
                    generation: slot.generation,
                };
                Some((handle, value))
            })
    }

    fn lookup(&self, index: u32, generation: u16) -> Result<&T, HandleError> {
        let slot = self.slots
            .get(index as usize)
            .ok_or(HandleError::OutOfBounds { index })?;

        match &slot.value {
            Some(value) if slot.generation == generation => Ok(value),
            _ => Err(HandleError::Stale { index, generation }),
        }
    }
}

impl<T: Debug> Debug for HandleTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}


/// Interner of immutable values
///
/// Equal values share a single [`ConstHandle`]. Values are never removed, handles stay valid
/// for as long as the pool lives.
///
/// ```rust
/// # use nanword::ConstPool;
/// let mut pool = ConstPool::new();
/// let a = pool.intern("hello").unwrap();
/// let b = pool.intern("hello").unwrap();
///
/// assert_eq!(a, b);
/// assert_eq!(pool.get(a), Ok(&"hello"));
/// ```
pub struct ConstPool<T> {
    values: Vec<T>,
    dedup: HashMap<T, u32>,
}

impl<T> Default for ConstPool<T> {
    fn default() -> Self {
        ConstPool {
            values: Vec::new(),
            dedup: HashMap::default(),
        }
    }
}

impl<T: Eq + Hash + Clone> ConstPool<T> {
    pub fn new() -> ConstPool<T> {
        ConstPool::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn intern(&mut self, value: T) -> Result<ConstHandle, HandleError> {
        if let Some(&index) = self.dedup.get(&value) {
            return Ok(ConstHandle { index, generation: 0 });
        }

        let index = u32::try_from(self.values.len()).map_err(|_| HandleError::TableFull)?;
        self.dedup.insert(value.clone(), index);
        self.values.push(value);

        trace!(index, "intern");
        Ok(ConstHandle { index, generation: 0 })
    }

    pub fn get(&self, handle: ConstHandle) -> Result<&T, HandleError> {
        let ConstHandle { index, generation } = handle;
        if generation != 0 {
            return Err(HandleError::Stale { index, generation });
        }
        self.values
            .get(index as usize)
            .ok_or(HandleError::OutOfBounds { index })
    }
}

impl<T: Debug> Debug for ConstPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.values).finish()
    }
}
