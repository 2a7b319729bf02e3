//! Member descriptors for structured types.
//!
//! A struct maps to a group keyed by member name. Its members are listed once, in a
//! static table, by [`vkv_object!`](crate::vkv_object); each entry knows how to read
//! its value out of the struct and how to write a decoded value back in.
//!
//! ```
//! use vkv_core::{from_str, to_string_value, vkv_object, VkvOptions};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Window {
//!     title: String,
//!     width: u32,
//!     cache: Vec<u8>,
//! }
//!
//! vkv_object!(Window {
//!     #[rename = "Title"] title,
//!     width,
//!     #[ignore] cache,
//! });
//!
//! let window = Window { title: "main".into(), width: 800, cache: vec![1] };
//! let text = to_string_value(&window, "window", &VkvOptions::default());
//! assert_eq!(text, "window\n{\n    Title\t\tmain\n    width\t\t800\n}\n");
//!
//! let back: Window = from_str(&text, &VkvOptions::default()).unwrap().unwrap();
//! assert_eq!(back, Window { cache: vec![], ..window });
//! ```

use crate::convert::expect_tree;
use crate::error::Result;
use crate::node::{Node, TreeNode};
use crate::options::VkvOptions;

/// Whether a member is stored data or a computed accessor pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    /// Skipped unless [`VkvOptions::serialize_properties`] is on.
    Property,
}

/// Encoder for one member: read it from the owner and build its node.
pub type EncodeFn<T> = fn(&T, &VkvOptions) -> Option<Node>;

/// Decoder for one member: decode the node and store it in the owner.
pub type DecodeFn<T> = fn(&mut T, &Node, &VkvOptions) -> Result<()>;

/// One entry of a type's member table.
pub struct Member<T> {
    name: &'static str,
    kind: MemberKind,
    ignored: bool,
    encode: EncodeFn<T>,
    decode: DecodeFn<T>,
}

impl<T> Member<T> {
    pub fn field(name: &'static str, encode: EncodeFn<T>, decode: DecodeFn<T>) -> Self {
        Member {
            name,
            kind: MemberKind::Field,
            ignored: false,
            encode,
            decode,
        }
    }

    pub fn property(name: &'static str, encode: EncodeFn<T>, decode: DecodeFn<T>) -> Self {
        Member {
            kind: MemberKind::Property,
            ..Self::field(name, encode, decode)
        }
    }

    /// Use `name` as the key instead of the member's own name.
    pub fn rename(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Skip this member on both encode and decode.
    pub fn ignore(mut self) -> Self {
        self.ignored = true;
        self
    }

    /// Mark this member as a property.
    pub fn as_property(mut self) -> Self {
        self.kind = MemberKind::Property;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    pub fn is_ignored(&self) -> bool {
        self.ignored
    }

    /// Whether this member takes part in mapping under `options`.
    pub fn is_active(&self, options: &VkvOptions) -> bool {
        !self.ignored && (self.kind == MemberKind::Field || options.serialize_properties)
    }
}

/// A struct with a member table. Usually implemented by [`vkv_object!`](crate::vkv_object).
pub trait VkvObject: Default + Sized + 'static {
    fn members() -> &'static [Member<Self>];
}

/// Encode every active member. Members that encode to nothing are left out.
pub fn encode_object<T: VkvObject>(value: &T, options: &VkvOptions) -> Option<Node> {
    let tree = TreeNode::from_entries(
        T::members()
            .iter()
            .filter(|member| member.is_active(options))
            .map(|member| (member.name, (member.encode)(value, options))),
    );
    Some(Node::Tree(tree))
}

/// Decode onto `T::default()`. Only members present in the group are assigned;
/// unknown children are ignored.
pub fn decode_object<T: VkvObject>(node: &Node, options: &VkvOptions) -> Result<T> {
    let tree = expect_tree(node, std::any::type_name::<T>())?;
    let mut value = T::default();
    for member in T::members().iter().filter(|member| member.is_active(options)) {
        if let Some(child) = tree.get(member.name) {
            (member.decode)(&mut value, child, options)?;
        }
    }
    Ok(value)
}

/// Declare the member table of a struct and implement the mapping traits for it.
///
/// Fields are listed by name, optionally preceded by `#[rename = "Key"]`, `#[ignore]`
/// or `#[as_property]`. Computed members go in a trailing `properties` block as
/// `"Key" => getter / setter`; getters take `&self` and return the value, setters take
/// `&mut self` and the value.
///
/// The struct must implement `Default`.
#[macro_export]
macro_rules! vkv_object {
    (
        $ty:ty {
            $( $(#[$fattr:ident $(= $fval:literal)?])* $field:ident ),* $(,)?
        }
        $(
            properties {
                $( $(#[$pattr:ident $(= $pval:literal)?])* $pname:literal => $getter:ident / $setter:ident ),* $(,)?
            }
        )?
    ) => {
        impl $crate::object::VkvObject for $ty {
            fn members() -> &'static [$crate::object::Member<Self>] {
                static MEMBERS: ::std::sync::OnceLock<::std::vec::Vec<$crate::object::Member<$ty>>> =
                    ::std::sync::OnceLock::new();
                MEMBERS.get_or_init(|| {
                    ::std::vec![
                        $(
                            $crate::object::Member::<$ty>::field(
                                stringify!($field),
                                |value, options| $crate::convert::ToNode::to_node(&value.$field, options),
                                |value, node, options| {
                                    value.$field = $crate::convert::FromNode::from_node(node, options)?;
                                    ::std::result::Result::Ok(())
                                },
                            )
                            $( .$fattr($($fval)?) )*,
                        )*
                        $($(
                            $crate::object::Member::<$ty>::property(
                                $pname,
                                |value, options| $crate::convert::ToNode::to_node(&value.$getter(), options),
                                |value, node, options| {
                                    value.$setter($crate::convert::FromNode::from_node(node, options)?);
                                    ::std::result::Result::Ok(())
                                },
                            )
                            $( .$pattr($($pval)?) )*,
                        )*)?
                    ]
                })
            }
        }

        impl $crate::convert::ToNode for $ty {
            fn to_node(
                &self,
                options: &$crate::options::VkvOptions,
            ) -> ::std::option::Option<$crate::node::Node> {
                $crate::object::encode_object(self, options)
            }
        }

        impl $crate::convert::FromNode for $ty {
            fn from_node(
                node: &$crate::node::Node,
                options: &$crate::options::VkvOptions,
            ) -> $crate::error::Result<Self> {
                $crate::object::decode_object(node, options)
            }
        }
    };
}

/// Map a fieldless enum to its variant names, matched case-insensitively on decode.
///
/// ```
/// use vkv_core::{from_str, vkv_enum, VkvOptions};
///
/// #[derive(Debug, PartialEq)]
/// enum Mode { Windowed, Fullscreen }
/// vkv_enum!(Mode { Windowed, Fullscreen });
///
/// let mode: Mode = from_str("mode FULLSCREEN", &VkvOptions::default()).unwrap().unwrap();
/// assert_eq!(mode, Mode::Fullscreen);
/// ```
#[macro_export]
macro_rules! vkv_enum {
    ($ty:ident { $($variant:ident),* $(,)? }) => {
        impl $crate::convert::Primitive for $ty {
            fn to_scalar(&self) -> $crate::scalar::Scalar {
                let name = match self {
                    $( $ty::$variant => stringify!($variant), )*
                };
                $crate::scalar::Scalar::String(name.to_string())
            }

            fn from_scalar(scalar: &$crate::scalar::Scalar) -> $crate::error::Result<Self> {
                let text = scalar.to_string();
                $(
                    if text.eq_ignore_ascii_case(stringify!($variant)) {
                        return ::std::result::Result::Ok($ty::$variant);
                    }
                )*
                ::std::result::Result::Err($crate::convert::mismatch(scalar, stringify!($ty)))
            }

            fn from_text(text: &str) -> $crate::error::Result<Self> {
                Self::from_scalar(&$crate::scalar::Scalar::from(text))
            }
        }

        $crate::impl_primitive_node!($ty);
    };
}
