//! The type pool: storage, interning and layout queries.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::layout::align_up;
use crate::{Idx, Layout, Tag, TypeError};

/// A struct field with its resolved byte offset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: Box<str>,
    pub ty: Idx,
    pub offset: u64,
}

#[derive(Clone, Debug)]
struct StructDef {
    name: Box<str>,
    fields: SmallVec<[Field; 4]>,
    /// `None` until the struct is defined.
    layout: Option<Layout>,
}

#[derive(Clone, Debug)]
enum Item {
    Scalar(Tag),
    Str,
    Array { elem: Idx, len: u64 },
    Ptr(Idx),
    Slice(Idx),
    Map { key: Idx, value: Idx },
    Chan(Idx),
    Func,
    Interface { name: Option<Box<str>> },
    Struct(StructDef),
}

/// Interning key for structural types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
enum Shape {
    Array(Idx, u64),
    Ptr(Idx),
    Slice(Idx),
    Map(Idx, Idx),
    Chan(Idx),
}

/// Storage for every type known to the runtime.
#[derive(Clone, Debug)]
pub struct Pool {
    items: Vec<Item>,
    interned: FxHashMap<Shape, Idx>,
}

const SCALARS: [Tag; 12] = [
    Tag::Bool,
    Tag::I8,
    Tag::I16,
    Tag::I32,
    Tag::I64,
    Tag::U8,
    Tag::U16,
    Tag::U32,
    Tag::U64,
    Tag::Usize,
    Tag::F32,
    Tag::F64,
];

impl Pool {
    /// Create a pool with the primitive types pre-interned.
    pub fn new() -> Self {
        let mut items: Vec<Item> = SCALARS.iter().map(|&t| Item::Scalar(t)).collect();
        items.push(Item::Str);
        items.push(Item::Interface { name: None });
        items.push(Item::Func);
        debug_assert_eq!(items.len(), Idx::PRIMITIVE_COUNT as usize);

        Self {
            items,
            interned: FxHashMap::default(),
        }
    }

    /// Number of types in the pool, primitives included.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[allow(clippy::cast_possible_truncation, reason = "pools never hold 4 billion types")]
    fn push(&mut self, item: Item) -> Idx {
        let idx = Idx::from_raw(self.items.len() as u32);
        self.items.push(item);
        idx
    }

    fn intern(&mut self, shape: Shape, item: Item) -> Idx {
        if let Some(&idx) = self.interned.get(&shape) {
            return idx;
        }
        let idx = self.push(item);
        self.interned.insert(shape, idx);
        idx
    }

    fn item(&self, idx: Idx) -> &Item {
        match self.items.get(idx.raw() as usize) {
            Some(item) => item,
            None => panic!("{idx:?} does not belong to this pool"),
        }
    }

    // === Constructors ===

    /// Pointer type `*elem`.
    pub fn ptr(&mut self, elem: Idx) -> Idx {
        self.intern(Shape::Ptr(elem), Item::Ptr(elem))
    }

    /// Slice type `[]elem`.
    pub fn slice(&mut self, elem: Idx) -> Idx {
        self.intern(Shape::Slice(elem), Item::Slice(elem))
    }

    /// Inline array type `[len]elem`.
    pub fn array(&mut self, elem: Idx, len: u64) -> Idx {
        self.intern(Shape::Array(elem, len), Item::Array { elem, len })
    }

    /// Map type `map[key]value`.
    pub fn map(&mut self, key: Idx, value: Idx) -> Idx {
        self.intern(Shape::Map(key, value), Item::Map { key, value })
    }

    /// Channel type `chan elem`.
    pub fn chan(&mut self, elem: Idx) -> Idx {
        self.intern(Shape::Chan(elem), Item::Chan(elem))
    }

    /// A named interface type. Every call creates a distinct type.
    pub fn interface(&mut self, name: &str) -> Idx {
        self.push(Item::Interface {
            name: Some(name.into()),
        })
    }

    /// Declare a struct without fields. It has no layout until
    /// [`define_struct`](Self::define_struct) is called, but pointers to it
    /// can already be formed.
    pub fn declare_struct(&mut self, name: &str) -> Idx {
        self.push(Item::Struct(StructDef {
            name: name.into(),
            fields: SmallVec::new(),
            layout: None,
        }))
    }

    /// Give a declared struct its fields and compute its layout.
    ///
    /// Fields are laid out in order, each at the next offset aligned to its
    /// type; the total size is rounded up to the largest field alignment.
    pub fn define_struct(&mut self, idx: Idx, fields: &[(&str, Idx)]) -> Result<(), TypeError> {
        let name = match self.items.get(idx.raw() as usize) {
            Some(Item::Struct(def)) if def.layout.is_some() => {
                return Err(TypeError::AlreadyDefined {
                    name: def.name.to_string(),
                })
            }
            Some(Item::Struct(def)) => def.name.to_string(),
            _ => return Err(TypeError::NotAStruct(idx)),
        };

        let mut seen = FxHashSet::default();
        let mut resolved = SmallVec::with_capacity(fields.len());
        let mut offset = 0;
        let mut align = 1;
        for &(field, ty) in fields {
            if !seen.insert(field) {
                return Err(TypeError::DuplicateField {
                    name,
                    field: field.to_string(),
                });
            }
            let Some(layout) = self.layout(ty) else {
                return Err(TypeError::UnsizedField {
                    name,
                    field: field.to_string(),
                    ty,
                });
            };
            offset = align_up(offset, layout.align);
            resolved.push(Field {
                name: field.into(),
                ty,
                offset,
            });
            offset += layout.size;
            align = align.max(layout.align);
        }
        let layout = Layout::new(align_up(offset, align), align);

        if let Some(Item::Struct(def)) = self.items.get_mut(idx.raw() as usize) {
            def.fields = resolved;
            def.layout = Some(layout);
        }
        Ok(())
    }

    /// Declare and define a struct in one step.
    pub fn new_struct(&mut self, name: &str, fields: &[(&str, Idx)]) -> Result<Idx, TypeError> {
        let idx = self.declare_struct(name);
        self.define_struct(idx, fields)?;
        Ok(idx)
    }

    // === Queries ===

    /// Kind of the type.
    pub fn tag(&self, idx: Idx) -> Tag {
        match self.item(idx) {
            Item::Scalar(tag) => *tag,
            Item::Str => Tag::Str,
            Item::Array { .. } => Tag::Array,
            Item::Ptr(_) => Tag::Ptr,
            Item::Slice(_) => Tag::Slice,
            Item::Map { .. } => Tag::Map,
            Item::Chan(_) => Tag::Chan,
            Item::Func => Tag::Func,
            Item::Interface { .. } => Tag::Interface,
            Item::Struct(_) => Tag::Struct,
        }
    }

    /// Element type of a pointer, slice, array or channel.
    pub fn elem(&self, idx: Idx) -> Idx {
        match self.item(idx) {
            Item::Ptr(elem) | Item::Slice(elem) | Item::Chan(elem) | Item::Array { elem, .. } => {
                *elem
            }
            _ => panic!("{} has no element type", self.name(idx)),
        }
    }

    /// Length of an array type.
    pub fn array_len(&self, idx: Idx) -> u64 {
        match self.item(idx) {
            Item::Array { len, .. } => *len,
            _ => panic!("{} is not an array type", self.name(idx)),
        }
    }

    /// Key type of a map.
    pub fn map_key(&self, idx: Idx) -> Idx {
        match self.item(idx) {
            Item::Map { key, .. } => *key,
            _ => panic!("{} is not a map type", self.name(idx)),
        }
    }

    /// Value type of a map.
    pub fn map_value(&self, idx: Idx) -> Idx {
        match self.item(idx) {
            Item::Map { value, .. } => *value,
            _ => panic!("{} is not a map type", self.name(idx)),
        }
    }

    /// Fields of a struct. Empty for a declared but undefined struct.
    pub fn struct_fields(&self, idx: Idx) -> &[Field] {
        match self.item(idx) {
            Item::Struct(def) => &def.fields,
            _ => panic!("{} is not a struct type", self.name(idx)),
        }
    }

    /// Look up a struct field by name.
    pub fn field(&self, idx: Idx, name: &str) -> Option<&Field> {
        self.struct_fields(idx).iter().find(|f| &*f.name == name)
    }

    /// Byte offset of a named struct field.
    pub fn field_offset(&self, idx: Idx, name: &str) -> Option<u64> {
        self.field(idx, name).map(|f| f.offset)
    }

    /// Check if `ptr` is the pointer type `*elem`.
    pub fn is_ptr_to(&self, ptr: Idx, elem: Idx) -> bool {
        matches!(self.item(ptr), Item::Ptr(e) if *e == elem)
    }

    /// Layout of a value of this type, or `None` for an undefined struct
    /// (or an array of one).
    pub fn layout(&self, idx: Idx) -> Option<Layout> {
        match self.item(idx) {
            Item::Scalar(tag) => Some(scalar_layout(*tag)),
            Item::Str | Item::Interface { .. } => Some(Layout::words(2)),
            Item::Slice(_) => Some(Layout::words(3)),
            Item::Ptr(_) | Item::Map { .. } | Item::Chan(_) | Item::Func => Some(Layout::words(1)),
            Item::Array { elem, len } => self.layout(*elem).map(|l| l.repeat(*len)),
            Item::Struct(def) => def.layout,
        }
    }

    /// Static size of a value of this type.
    ///
    /// # Panics
    ///
    /// Panics if the type has no layout.
    pub fn size_of(&self, idx: Idx) -> u64 {
        match self.layout(idx) {
            Some(layout) => layout.size,
            None => panic!("{} has no layout", self.name(idx)),
        }
    }

    /// Alignment of a value of this type.
    ///
    /// # Panics
    ///
    /// Panics if the type has no layout.
    pub fn align_of(&self, idx: Idx) -> u64 {
        match self.layout(idx) {
            Some(layout) => layout.align,
            None => panic!("{} has no layout", self.name(idx)),
        }
    }

    /// Human-readable type name, e.g. `*Node`, `[]i32`, `map[str]u64`.
    pub fn name(&self, idx: Idx) -> String {
        if let Some(name) = idx.name() {
            return name.to_string();
        }
        match self.item(idx) {
            Item::Scalar(tag) => tag.name().to_string(),
            Item::Str => "str".to_string(),
            Item::Func => "fn".to_string(),
            Item::Array { elem, len } => format!("[{len}]{}", self.name(*elem)),
            Item::Ptr(elem) => format!("*{}", self.name(*elem)),
            Item::Slice(elem) => format!("[]{}", self.name(*elem)),
            Item::Map { key, value } => {
                format!("map[{}]{}", self.name(*key), self.name(*value))
            }
            Item::Chan(elem) => format!("chan {}", self.name(*elem)),
            Item::Interface { name } => name.as_deref().unwrap_or("any").to_string(),
            Item::Struct(def) => def.name.to_string(),
        }
    }
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}

const fn scalar_layout(tag: Tag) -> Layout {
    match tag {
        Tag::I16 | Tag::U16 => Layout::new(2, 2),
        Tag::I32 | Tag::U32 | Tag::F32 => Layout::new(4, 4),
        Tag::I64 | Tag::U64 | Tag::Usize | Tag::F64 => Layout::new(8, 8),
        _ => Layout::new(1, 1),
    }
}
