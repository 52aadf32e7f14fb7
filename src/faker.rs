//! Fake personal data for generated accounts.
//!
//! Wraps the `fake` crate so every value is drawn from the caller's RNG, which
//! keeps runs reproducible when the seeder is configured with a fixed seed.

use fake::Fake;
use fake::faker::address::en::{BuildingNumber, CityName, PostCode, StateAbbr, StreetName};
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use rand::Rng;

/// Source of human-looking names, phone numbers and addresses.
#[derive(Debug, Clone, Copy, Default)]
pub struct Faker;

impl Faker {
    pub fn new() -> Self {
        Self
    }

    /// Full personal name, e.g. "Marcus Reilly".
    pub fn name<R: Rng>(&self, rng: &mut R) -> String {
        Name().fake_with_rng(rng)
    }

    pub fn phone_number<R: Rng>(&self, rng: &mut R) -> String {
        PhoneNumber().fake_with_rng(rng)
    }

    /// Single-line postal address.
    pub fn address<R: Rng>(&self, rng: &mut R) -> String {
        let building: String = BuildingNumber().fake_with_rng(rng);
        let street: String = StreetName().fake_with_rng(rng);
        let city: String = CityName().fake_with_rng(rng);
        let state: String = StateAbbr().fake_with_rng(rng);
        let post_code: String = PostCode().fake_with_rng(rng);
        format!("{building} {street}, {city}, {state} {post_code}")
    }
}
