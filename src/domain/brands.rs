//! Fixed catalog of organization brands and the currency/category options
//! each one allows. The currency constraint is soft: the form defaults to the
//! first option and the storage layer never rejects a mismatch.

pub const BRAND_OPTIONS: &[(&str, &[&str])] = &[
    (
        "BAJI",
        &[
            "BDT", "INR", "PKR", "NPR", "AED", "SAR", "OMR", "News", "Official", "Meme", "AI",
            "Others",
        ],
    ),
    (
        "JeetBuzz",
        &["BDT", "INR", "PKR", "News", "Official", "Meme", "AI", "Others"],
    ),
    (
        "SIX6S",
        &["BDT", "INR", "PKR", "News", "Official", "Meme", "AI", "Others"],
    ),
    (
        "TekkaBuzz",
        &["BDT", "PKR", "News", "Official", "Meme", "AI", "Others"],
    ),
    ("BADSHA", &["BDT", "News", "Official", "Meme", "AI", "Others"]),
    (
        "CAZ VIP",
        &["ALL", "BAJI", "JeetBuzz", "SIX6S", "BADSHA", "TekkaBuzz", "Others"],
    ),
];

pub fn options_for(brand: &str) -> Option<&'static [&'static str]> {
    BRAND_OPTIONS
        .iter()
        .find(|(name, _)| *name == brand)
        .map(|(_, options)| *options)
}

pub fn default_currency_for(brand: &str) -> Option<&'static str> {
    options_for(brand).and_then(|options| options.first().copied())
}
