//! Conversion of native `sr_val_t` into owned [`SrVal`]s.

use std::ffi::{c_char, CStr};
use std::marker::PhantomData;

use sysrepo_types::{SrData, SrType, SrVal};

use crate::native::sr_val_t;
use crate::trampolines::get_val;

/// Construction from a native value pointer.
pub trait FromRawVal: Sized {
    /// Copies a native value. Returns `None` for a null pointer.
    ///
    /// # Safety
    ///
    /// `val` must be null or point to a valid `sr_val_t` whose string
    /// members are null or valid C strings.
    unsafe fn from_raw(val: *const sr_val_t) -> Option<Self>;
}

impl FromRawVal for SrVal {
    unsafe fn from_raw(val: *const sr_val_t) -> Option<Self> {
        let val = val.as_ref()?;
        let xpath = c_string(val.xpath);
        Some(SrVal::from_data(xpath, val.dflt, &decode_data(val)))
    }
}

/// Decodes the live member of a value's payload union.
///
/// # Safety
///
/// `val.type_` must describe the live union member, and string members must
/// be null or valid C strings.
pub unsafe fn decode_data(val: &sr_val_t) -> SrData {
    let data = &val.data;
    match SrType::from_raw(val.type_) {
        Some(SrType::Binary) => SrData::Binary(c_string(data.binary_val)),
        Some(SrType::Bits) => SrData::Bits(c_string(data.bits_val)),
        Some(SrType::Bool) => SrData::Bool(data.bool_val),
        Some(SrType::Decimal64) => SrData::Decimal64(data.decimal64_val),
        Some(SrType::Enum) => SrData::Enum(c_string(data.enum_val)),
        Some(SrType::IdentityRef) => SrData::IdentityRef(c_string(data.identityref_val)),
        Some(SrType::InstanceId) => SrData::InstanceId(c_string(data.instanceid_val)),
        Some(SrType::Int8) => SrData::Int8(data.int8_val),
        Some(SrType::Int16) => SrData::Int16(data.int16_val),
        Some(SrType::Int32) => SrData::Int32(data.int32_val),
        Some(SrType::Int64) => SrData::Int64(data.int64_val),
        Some(SrType::String) => SrData::String(c_string(data.string_val)),
        Some(SrType::Uint8) => SrData::Uint8(data.uint8_val),
        Some(SrType::Uint16) => SrData::Uint16(data.uint16_val),
        Some(SrType::Uint32) => SrData::Uint32(data.uint32_val),
        Some(SrType::Uint64) => SrData::Uint64(data.uint64_val),
        Some(SrType::AnyXml) => SrData::AnyXml(c_string(data.anyxml_val)),
        Some(SrType::AnyData) => SrData::AnyData(c_string(data.anydata_val)),
        Some(kind) => SrData::Empty(kind),
        None => SrData::Empty(SrType::Unknown),
    }
}

/// Copies a C string, mapping null to the empty string.
///
/// # Safety
///
/// `ptr` must be null or a valid C string.
pub(crate) unsafe fn c_string(ptr: *const c_char) -> String {
    if ptr.is_null() {
        String::new()
    } else {
        CStr::from_ptr(ptr).to_string_lossy().into_owned()
    }
}

/// Borrowed view of a native value array, as returned by `sr_get_items`.
///
/// Elements are reached through [`get_val`], the same indexing helper C
/// callers use.
#[derive(Clone, Copy)]
pub struct ValArray<'a> {
    base: *mut sr_val_t,
    len: usize,
    _marker: PhantomData<&'a sr_val_t>,
}

impl<'a> ValArray<'a> {
    /// Wraps `len` contiguous values starting at `base`.
    ///
    /// # Safety
    ///
    /// `base` must point to at least `len` valid values that outlive `'a`,
    /// or `len` must be zero. A null `base` yields an empty array.
    pub unsafe fn from_raw_parts(base: *mut sr_val_t, len: usize) -> Self {
        Self {
            base,
            len: if base.is_null() { 0 } else { len },
            _marker: PhantomData,
        }
    }

    /// Returns the number of values.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if there are no values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the value at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<&'a sr_val_t> {
        if index >= self.len {
            return None;
        }
        // Safety: index is in bounds of the array promised by from_raw_parts.
        unsafe { get_val(self.base, index).as_ref() }
    }

    /// Iterates over the values.
    pub fn iter(&self) -> impl Iterator<Item = &'a sr_val_t> + 'a {
        let array = *self;
        (0..self.len).filter_map(move |idx| array.get(idx))
    }

    /// Copies every value.
    pub fn to_vec(&self) -> Vec<SrVal> {
        self.iter()
            // Safety: elements are valid per from_raw_parts.
            .filter_map(|val| unsafe { SrVal::from_raw(val) })
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::ffi::CString;
    use std::mem::MaybeUninit;

    /// Owns the strings a test `sr_val_t` points into.
    pub struct OwnedVal {
        pub raw: sr_val_t,
        _strings: Vec<CString>,
    }

    pub fn zeroed_val() -> sr_val_t {
        // Safety: all-zero is a valid sr_val_t (null pointers, zero scalars).
        unsafe { MaybeUninit::<sr_val_t>::zeroed().assume_init() }
    }

    pub fn string_val(xpath: &str, kind: SrType, value: &str) -> OwnedVal {
        let xpath = CString::new(xpath).unwrap();
        let value = CString::new(value).unwrap();
        let mut raw = zeroed_val();
        raw.xpath = xpath.as_ptr() as *mut c_char;
        raw.type_ = kind.as_raw();
        raw.data.string_val = value.as_ptr() as *mut c_char;
        OwnedVal {
            raw,
            _strings: vec![xpath, value],
        }
    }

    pub fn scalar_val(xpath: &str, kind: SrType, fill: impl FnOnce(&mut sr_val_t)) -> OwnedVal {
        let xpath = CString::new(xpath).unwrap();
        let mut raw = zeroed_val();
        raw.xpath = xpath.as_ptr() as *mut c_char;
        raw.type_ = kind.as_raw();
        fill(&mut raw);
        OwnedVal {
            raw,
            _strings: vec![xpath],
        }
    }
}
