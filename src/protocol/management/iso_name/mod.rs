//! ISO 11783 / SAE J1939 NAME field (64 bits, §3.2). This field uniquely
//! identifies a node on the network and doubles as the arbitration key
//! during address claiming: a lower packed value wins contention.
//!
//! # Bit layout (LSB-first)
//!
//! ```text
//! Bits  0-20 (21 bits): unique number
//! Bits 21-31 (11 bits): manufacturer code
//! Bits 32-34 ( 3 bits): device instance, lower part
//! Bits 35-39 ( 5 bits): device instance, upper part
//! Bits 40-47 ( 8 bits): device function
//! Bit  48    ( 1 bit ): reserved
//! Bits 49-55 ( 7 bits): device class
//! Bits 56-59 ( 4 bits): system instance
//! Bits 60-62 ( 3 bits): industry group
//! Bit  63    ( 1 bit ): arbitrary address capable
//! ```
use std::fmt;

/// Compact wrapper around the 64-bit NAME used in PGN 60928 (Address
/// Claimed / Cannot Claim).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoName(u64);

impl IsoName {
    /// Wraps a raw, already-packed NAME value.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the packed 64-bit value, little-endian on the wire (§6.2).
    #[inline]
    pub const fn raw(&self) -> u64 {
        self.0
    }

    /// Starts building a NAME field by field.
    #[inline]
    pub const fn builder() -> IsoNameBuilder {
        IsoNameBuilder::new()
    }

    /// Unique number (bits 0-20, 21 bits): identifies the product within
    /// the manufacturer's lineup.
    #[inline]
    pub const fn unique_number(&self) -> u32 {
        (self.0 & 0x1F_FFFF) as u32
    }

    /// Manufacturer code (bits 21-31, 11 bits).
    #[inline]
    pub const fn manufacturer_code(&self) -> u16 {
        ((self.0 >> 21) & 0x7FF) as u16
    }

    /// Lower 3 bits of the device instance (bits 32-34).
    #[inline]
    pub const fn device_instance_lower(&self) -> u8 {
        ((self.0 >> 32) & 0x07) as u8
    }

    /// Upper 5 bits of the device instance (bits 35-39).
    #[inline]
    pub const fn device_instance_upper(&self) -> u8 {
        ((self.0 >> 35) & 0x1F) as u8
    }

    /// Full 8-bit device instance, merging the lower and upper parts.
    #[inline]
    pub const fn device_instance(&self) -> u8 {
        self.device_instance_lower() | (self.device_instance_upper() << 3)
    }

    /// Device function (bits 40-47, 8 bits).
    #[inline]
    pub const fn device_function(&self) -> u8 {
        ((self.0 >> 40) & 0xFF) as u8
    }

    /// Reserved bit (bit 48). Always `false` on equipment built by this crate.
    #[inline]
    pub const fn spare(&self) -> bool {
        ((self.0 >> 48) & 0x01) != 0
    }

    /// Device class (bits 49-55, 7 bits).
    #[inline]
    pub const fn device_class(&self) -> u8 {
        ((self.0 >> 49) & 0x7F) as u8
    }

    /// System instance (bits 56-59, 4 bits).
    #[inline]
    pub const fn system_instance(&self) -> u8 {
        ((self.0 >> 56) & 0x0F) as u8
    }

    /// Industry group (bits 60-62, 3 bits). `4` is the marine industry.
    #[inline]
    pub const fn industry_group(&self) -> u8 {
        ((self.0 >> 60) & 0x07) as u8
    }

    /// Arbitrary Address Capable bit (bit 63): when set, the address-claim
    /// procedure may probe alternative addresses on conflict (§4.4).
    #[inline]
    pub const fn is_arbitrary_address_capable(&self) -> bool {
        ((self.0 >> 63) & 0x01) != 0
    }

    /// `true` when the equipment is tagged as the marine industry group.
    #[inline]
    pub const fn is_marine(&self) -> bool {
        self.industry_group() == 4
    }
}

impl From<u64> for IsoName {
    #[inline]
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

impl From<IsoName> for u64 {
    #[inline]
    fn from(name: IsoName) -> Self {
        name.raw()
    }
}

impl fmt::Display for IsoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IsoName {{ unique: {}, mfg: {}, instance: {}, function: {}, class: {}, aac: {} }}",
            self.unique_number(),
            self.manufacturer_code(),
            self.device_instance(),
            self.device_function(),
            self.device_class(),
            self.is_arbitrary_address_capable()
        )
    }
}

/// Fluent builder that masks each field to its declared width on write,
/// silently discarding overflow bits (§3.2 invariant, §9).
#[derive(Debug, Clone, Copy, Default)]
pub struct IsoNameBuilder {
    raw: u64,
}

impl IsoNameBuilder {
    /// Starts from a fully cleared NAME.
    #[inline]
    pub const fn new() -> Self {
        Self { raw: 0 }
    }

    /// Sets the unique number, masked to 21 bits.
    #[inline]
    pub const fn unique_number(mut self, value: u32) -> Self {
        self.raw = (self.raw & !0x1F_FFFF) | (value as u64 & 0x1F_FFFF);
        self
    }

    /// Sets the manufacturer code, masked to 11 bits.
    #[inline]
    pub const fn manufacturer_code(mut self, value: u16) -> Self {
        self.raw = (self.raw & !(0x7FF << 21)) | ((value as u64 & 0x7FF) << 21);
        self
    }

    /// Sets the lower device-instance bits, masked to 3 bits.
    #[inline]
    pub const fn device_instance_lower(mut self, value: u8) -> Self {
        self.raw = (self.raw & !(0x07 << 32)) | ((value as u64 & 0x07) << 32);
        self
    }

    /// Sets the upper device-instance bits, masked to 5 bits.
    #[inline]
    pub const fn device_instance_upper(mut self, value: u8) -> Self {
        self.raw = (self.raw & !(0x1F << 35)) | ((value as u64 & 0x1F) << 35);
        self
    }

    /// Convenience setter for the full 8-bit device instance.
    #[inline]
    pub const fn device_instance(self, value: u8) -> Self {
        self.device_instance_lower(value & 0x07)
            .device_instance_upper((value >> 3) & 0x1F)
    }

    /// Sets the device function, 8 bits (no masking needed: already `u8`).
    #[inline]
    pub const fn device_function(mut self, value: u8) -> Self {
        self.raw = (self.raw & !(0xFF << 40)) | ((value as u64) << 40);
        self
    }

    /// Sets the reserved bit. Left `false` unless replicating a capture.
    #[inline]
    pub const fn spare(mut self, value: bool) -> Self {
        self.raw = (self.raw & !(0x01 << 48)) | ((value as u64) << 48);
        self
    }

    /// Sets the device class, masked to 7 bits.
    #[inline]
    pub const fn device_class(mut self, value: u8) -> Self {
        self.raw = (self.raw & !(0x7F << 49)) | ((value as u64 & 0x7F) << 49);
        self
    }

    /// Sets the system instance, masked to 4 bits.
    #[inline]
    pub const fn system_instance(mut self, value: u8) -> Self {
        self.raw = (self.raw & !(0x0F << 56)) | ((value as u64 & 0x0F) << 56);
        self
    }

    /// Sets the industry group, masked to 3 bits.
    #[inline]
    pub const fn industry_group(mut self, value: u8) -> Self {
        self.raw = (self.raw & !(0x07 << 60)) | ((value as u64 & 0x07) << 60);
        self
    }

    /// Sets the Arbitrary Address Capable bit.
    #[inline]
    pub const fn arbitrary_address_capable(mut self, value: bool) -> Self {
        self.raw = (self.raw & !(0x01 << 63)) | ((value as u64) << 63);
        self
    }

    /// Finishes the builder, producing the packed [`IsoName`].
    #[inline]
    pub const fn build(self) -> IsoName {
        IsoName(self.raw)
    }
}
