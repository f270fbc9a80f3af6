#![doc = include_str!("../README.md")]
#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![expect(unsafe_code, reason = "Type-erased storage is inherently unsafe.")]

extern crate alloc;

use alloc::boxed::Box;
use core::{
    any::{TypeId, type_name},
    fmt::{self, Debug, Formatter},
    mem::{self, ManuallyDrop, MaybeUninit},
    ptr::{self, NonNull},
};

/// The number of machine words a [`ValueCell`] stores inline unless told otherwise.
pub const DEFAULT_WORDS: usize = 3;

/// Where the current value of a [`ValueCell`] lives.
enum Repr<const WORDS: usize> {
    Empty,
    Inline([MaybeUninit<usize>; WORDS]),
    Boxed(NonNull<u8>),
}

/// Releases the value held by a [`Repr`].
///
/// # Safety
/// The `Repr` must hold a live value of the type the function was instantiated for.
type Dispose<const WORDS: usize> = unsafe fn(&mut Repr<WORDS>);

#[derive(Clone, Copy)]
struct Tag {
    id: TypeId,
    name: &'static str,
}

impl Tag {
    fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }
}

/// A type-erased container holding at most one value of any `'static` type.
///
/// Values whose size fits in `WORDS` machine words and whose alignment is at most that of a
/// machine word are stored inline. Everything else is boxed.
///
/// The cell records a disposal routine for the value it holds. [`set`](Self::set) takes
/// ownership, so disposal runs the value's destructor. [`set_unowned`](Self::set_unowned) does
/// not: the value is forgotten, and only the heap block of a boxed value is released.
///
/// A value is only ever read back as the type it was stored as. The checked accessors return
/// [`None`] on a mismatch, and the unchecked ones leave the check to the caller.
pub struct ValueCell<const WORDS: usize = DEFAULT_WORDS> {
    repr: Repr<WORDS>,
    tag: Option<Tag>,
    dispose: Option<Dispose<WORDS>>,
}

// SAFETY: only `Send + Sync` values can be stored, and the cell owns its storage exclusively.
unsafe impl<const WORDS: usize> Send for ValueCell<WORDS> {}

// SAFETY: shared access to the cell only hands out shared references to a `Sync` value.
unsafe impl<const WORDS: usize> Sync for ValueCell<WORDS> {}

impl<const WORDS: usize> ValueCell<WORDS> {
    /// The number of bytes available for inline storage.
    pub const CAPACITY: usize = WORDS * size_of::<usize>();

    /// Creates an empty cell.
    pub const fn new() -> Self {
        Self {
            repr: Repr::Empty,
            tag: None,
            dispose: None,
        }
    }

    /// Creates a cell that owns `value`.
    pub fn with_value<T: Send + Sync + 'static>(value: T) -> Self {
        let mut cell = Self::new();
        cell.set(value);
        cell
    }

    /// Returns `true` if a value of type `T` is stored without allocating.
    pub const fn stores_inline<T>() -> bool {
        size_of::<T>() <= Self::CAPACITY && align_of::<T>() <= align_of::<usize>()
    }

    /// Stores `value`, disposing of the previous contents first.
    ///
    /// The cell owns the value and runs its destructor when it is destroyed.
    pub fn set<T: Send + Sync + 'static>(&mut self, value: T) {
        self.store(value, true);
    }

    /// Stores `value` without taking responsibility for its destructor.
    ///
    /// The value's destructor never runs. Heap storage used for a large value is still
    /// released when the cell is destroyed.
    pub fn set_unowned<T: Send + Sync + 'static>(&mut self, value: T) {
        self.store(value, false);
    }

    fn store<T: Send + Sync + 'static>(&mut self, value: T, owned: bool) {
        self.destroy();

        if Self::stores_inline::<T>() {
            let mut words = [const { MaybeUninit::<usize>::uninit() }; WORDS];
            // SAFETY: `stores_inline` guarantees the buffer is large enough and sufficiently
            // aligned for `T`.
            unsafe { words.as_mut_ptr().cast::<T>().write(value) };
            self.repr = Repr::Inline(words);
            self.dispose = (owned && mem::needs_drop::<T>())
                .then_some(drop_inline::<T, WORDS> as Dispose<WORDS>);
        } else {
            let boxed = Box::new(ManuallyDrop::new(value));
            self.repr = Repr::Boxed(NonNull::from(Box::leak(boxed)).cast::<u8>());
            let dispose: Dispose<WORDS> = if owned {
                drop_boxed::<T, WORDS>
            } else {
                free_boxed::<T, WORDS>
            };
            self.dispose = Some(dispose);
        }

        self.tag = Some(Tag::of::<T>());
    }

    /// Disposes of the current value, if any, and leaves the cell empty.
    ///
    /// Calling this on an empty cell does nothing.
    pub fn destroy(&mut self) {
        if let Some(dispose) = self.dispose.take() {
            // SAFETY: `dispose` was recorded by `store` for the value currently held in `repr`.
            unsafe { dispose(&mut self.repr) };
        }
        self.repr = Repr::Empty;
        self.tag = None;
    }

    /// Returns `true` if the cell holds no value.
    pub fn is_empty(&self) -> bool {
        self.tag.is_none()
    }

    /// Returns `true` if the cell holds a value of type `T`.
    pub fn is<T: 'static>(&self) -> bool {
        self.tag.is_some_and(|tag| tag.id == TypeId::of::<T>())
    }

    /// Returns `true` if the current value lives in the inline buffer.
    pub fn is_inline(&self) -> bool {
        matches!(self.repr, Repr::Inline(_))
    }

    /// The [`TypeId`] of the current value.
    pub fn type_id(&self) -> Option<TypeId> {
        self.tag.map(|tag| tag.id)
    }

    /// The type name of the current value.
    pub fn type_name(&self) -> Option<&'static str> {
        self.tag.map(|tag| tag.name)
    }

    /// Returns a copy of the value if it is a `T`.
    pub fn get<T: Clone + 'static>(&self) -> Option<T> {
        self.get_ref::<T>().cloned()
    }

    /// Returns a reference to the value if it is a `T`.
    pub fn get_ref<T: 'static>(&self) -> Option<&T> {
        if !self.is::<T>() {
            return None;
        }
        // SAFETY: the tag was just checked.
        Some(unsafe { self.get_ref_unchecked::<T>() })
    }

    /// Returns a mutable reference to the value if it is a `T`.
    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        if !self.is::<T>() {
            return None;
        }
        // SAFETY: the tag was just checked.
        Some(unsafe { self.get_mut_unchecked::<T>() })
    }

    /// Returns a copy of the value without checking its type.
    ///
    /// # Safety
    /// The cell must hold a value of type `T`.
    pub unsafe fn get_unchecked<T: Clone + 'static>(&self) -> T {
        // SAFETY: upheld by the caller.
        unsafe { self.get_ref_unchecked::<T>() }.clone()
    }

    /// Returns a reference to the value without checking its type.
    ///
    /// # Safety
    /// The cell must hold a value of type `T`.
    pub unsafe fn get_ref_unchecked<T: 'static>(&self) -> &T {
        debug_assert!(
            self.is::<T>(),
            "attempted to read a `{}` from a cell holding {:?}",
            type_name::<T>(),
            self.type_name()
        );
        match &self.repr {
            // SAFETY: the caller guarantees the buffer holds an initialized `T`, and inline
            // storage is only used for types that fit its size and alignment.
            Repr::Inline(words) => unsafe { &*words.as_ptr().cast::<T>() },
            // SAFETY: the caller guarantees the block was allocated for a `T`.
            Repr::Boxed(ptr) => unsafe { ptr.cast::<T>().as_ref() },
            Repr::Empty => unreachable!("attempted to read from an empty cell"),
        }
    }

    /// Returns a mutable reference to the value without checking its type.
    ///
    /// # Safety
    /// The cell must hold a value of type `T`.
    pub unsafe fn get_mut_unchecked<T: 'static>(&mut self) -> &mut T {
        debug_assert!(self.is::<T>());
        match &mut self.repr {
            // SAFETY: see `get_ref_unchecked`.
            Repr::Inline(words) => unsafe { &mut *words.as_mut_ptr().cast::<T>() },
            // SAFETY: see `get_ref_unchecked`.
            Repr::Boxed(ptr) => unsafe { ptr.cast::<T>().as_mut() },
            Repr::Empty => unreachable!("attempted to write to an empty cell"),
        }
    }

    /// Moves the value out of the cell if it is a `T`, leaving the cell empty.
    ///
    /// Ownership passes to the caller regardless of how the value was stored. On a type
    /// mismatch the cell is left untouched.
    pub fn take<T: 'static>(&mut self) -> Option<T> {
        if !self.is::<T>() {
            return None;
        }
        let repr = mem::replace(&mut self.repr, Repr::Empty);
        self.tag = None;
        self.dispose = None;
        match repr {
            // SAFETY: the tag guarantees the buffer holds an initialized `T`, and it is read
            // exactly once since the buffer was moved out of the cell.
            Repr::Inline(words) => Some(unsafe { words.as_ptr().cast::<T>().read() }),
            Repr::Boxed(ptr) => {
                // SAFETY: the block was leaked from a `Box<ManuallyDrop<T>>` in `store`.
                let boxed = unsafe { Box::from_raw(ptr.cast::<ManuallyDrop<T>>().as_ptr()) };
                Some(ManuallyDrop::into_inner(*boxed))
            }
            Repr::Empty => None,
        }
    }
}

/// # Safety
/// `repr` must hold an initialized inline `T`.
unsafe fn drop_inline<T, const WORDS: usize>(repr: &mut Repr<WORDS>) {
    if let Repr::Inline(words) = repr {
        // SAFETY: upheld by the caller.
        unsafe { ptr::drop_in_place(words.as_mut_ptr().cast::<T>()) };
    }
}

/// # Safety
/// `repr` must point to a block leaked from a `Box<ManuallyDrop<T>>`.
unsafe fn drop_boxed<T, const WORDS: usize>(repr: &mut Repr<WORDS>) {
    if let Repr::Boxed(ptr) = repr {
        // SAFETY: `ManuallyDrop<T>` has the same layout as `T`.
        drop(unsafe { Box::from_raw(ptr.cast::<T>().as_ptr()) });
    }
}

/// # Safety
/// `repr` must point to a block leaked from a `Box<ManuallyDrop<T>>`.
unsafe fn free_boxed<T, const WORDS: usize>(repr: &mut Repr<WORDS>) {
    if let Repr::Boxed(ptr) = repr {
        // SAFETY: upheld by the caller. The value itself is never dropped.
        drop(unsafe { Box::from_raw(ptr.cast::<ManuallyDrop<T>>().as_ptr()) });
    }
}

impl<const WORDS: usize> Default for ValueCell<WORDS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const WORDS: usize> Drop for ValueCell<WORDS> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<const WORDS: usize> Debug for ValueCell<WORDS> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let storage = match self.repr {
            Repr::Empty => "empty",
            Repr::Inline(_) => "inline",
            Repr::Boxed(_) => "boxed",
        };
        f.debug_struct("ValueCell")
            .field("type_name", &self.type_name())
            .field("storage", &storage)
            .finish()
    }
}
