//! Network management: the J1939 NAME field (§3.2) and the dynamic
//! address-claim procedure built on top of it (J1939-81, §4.4).
pub mod address_claiming;
pub mod iso_name;
