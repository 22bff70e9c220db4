//! Display formatting helpers.

/// `25` → `#025`.
pub fn format_id(id: u32) -> String {
    format!("#{id:03}")
}

/// `mr-mime` → `Mr Mime`.
pub fn format_name(name: &str) -> String {
    name.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Decimetres to metres: `7` → `0.7m`.
pub fn format_height(decimetres: u32) -> String {
    format!("{:.1}m", f64::from(decimetres) / 10.0)
}

/// Hectograms to kilograms: `69` → `6.9kg`.
pub fn format_weight(hectograms: u32) -> String {
    format!("{:.1}kg", f64::from(hectograms) / 10.0)
}
