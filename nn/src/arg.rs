use std::collections::HashMap;

/// Scalar operator argument.
#[derive(Clone, Debug)]
pub enum Arg {
    Bool(bool),
    Int(u64),
    Float(f64),
    Str(&'static str),
    Arr(Box<[Self]>),
    Dict(HashMap<String, Self>),
}

macro_rules! impl_from {
    ($( $ty:ty => $variant:ident )+) => {
        $(
            impl From<$ty> for Arg {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )+
    };
}

impl_from! {
    bool => Bool
    u64  => Int
    f64  => Float
    &'static str           => Str
        Box<       [Self]> => Arr
    HashMap<String, Self > => Dict
}

impl Arg {
    pub fn bool(value: bool) -> Self {
        value.into()
    }

    pub fn int(value: usize) -> Self {
        (value as u64).into()
    }

    pub fn float(value: f64) -> Self {
        value.into()
    }

    pub fn arr(value: impl IntoIterator<Item = Self>) -> Self {
        Self::Arr(value.into_iter().collect())
    }

    pub fn dict<K: ToString>(value: impl IntoIterator<Item = (K, Self)>) -> Self {
        Self::Dict(
            value
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    /// Dict field lookup.
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Dict(map) => map.get(key),
            _ => None,
        }
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(val) => Some(*val),
            _ => None,
        }
    }

    pub const fn as_int(&self) -> Option<usize> {
        match self {
            Self::Int(val) => Some(*val as _),
            _ => None,
        }
    }

    pub const fn as_str(&self) -> Option<&'static str> {
        match self {
            Self::Str(val) => Some(val),
            _ => None,
        }
    }

    /// Arr of Int, e.g. a kernel/stride/shape list.
    pub fn as_dims(&self) -> Option<Vec<usize>> {
        match self {
            Self::Arr(args) => args.iter().map(Self::as_int).collect(),
            _ => None,
        }
    }
}
