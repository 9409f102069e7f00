//! Account field rules
//!
//! These checks are shared by the domain constructors and the HTTP form
//! validators, so a form error and a domain error always agree on wording.
//! Messages are user-facing and therefore in Indonesian.

/// Minimum password length
pub const MIN_PASSWORD_LEN: usize = 8;
/// Maximum password length
pub const MAX_PASSWORD_LEN: usize = 128;
/// Maximum display name length
pub const MAX_NAME_LEN: usize = 100;
/// Maximum address length
pub const MAX_ADDRESS_LEN: usize = 255;

/// Display name must be present and reasonably short
pub fn check_name(name: &str) -> Result<(), &'static str> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Nama wajib diisi");
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err("Nama terlalu panjang");
    }
    Ok(())
}

/// Password length bounds
pub fn check_password(password: &str) -> Result<(), &'static str> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err("Password minimal 8 karakter");
    }
    if len > MAX_PASSWORD_LEN {
        return Err("Password terlalu panjang");
    }
    Ok(())
}

/// Phone numbers: optional leading `+`, then 10 to 15 digits
pub fn check_phone(phone: &str) -> Result<(), &'static str> {
    let digits = phone.trim().strip_prefix('+').unwrap_or(phone.trim());
    let valid = (10..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err("Nomor telepon tidak valid")
    }
}

/// Address is free text with an upper bound
pub fn check_address(address: &str) -> Result<(), &'static str> {
    if address.chars().count() > MAX_ADDRESS_LEN {
        Err("Alamat terlalu panjang")
    } else {
        Ok(())
    }
}
