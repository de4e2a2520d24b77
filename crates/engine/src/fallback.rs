//! Deterministic fallback list builder — the terminal safety net.
//!
//! Pure function of its inputs: no I/O, no randomness, no failure path.
//! Combines universal fixed items, season-keyed clothing staples, and
//! travel-type additions. Produces well over the minimum item count, so the
//! [3,100] invariant holds by construction.

use packwise_core::packing::{PackingCategories, PackingItem};
use packwise_core::request::{Season, TravelType};

/// Build a packing list without the model.
pub fn generate(
    destination: &str,
    duration_days: u32,
    season: Season,
    travel_type: TravelType,
) -> PackingCategories {
    let mut categories = PackingCategories::default();

    // Universal items — present on every list regardless of input.
    categories.documents.push(item(
        "Passport",
        1,
        &format!("Required for international travel to {destination}"),
    ));
    categories.documents.push(item(
        "Travel Insurance",
        1,
        "Coverage for medical emergencies and cancellations",
    ));
    categories
        .tech
        .push(item("Phone Charger", 1, "Keep your phone usable throughout the trip"));
    categories.tech.push(item(
        "Universal Adapter",
        1,
        "Socket standards differ between countries",
    ));
    categories.hygiene.push(item("Toothbrush", 1, "Daily hygiene"));
    categories.hygiene.push(item("Toothpaste", 1, "Daily hygiene"));
    categories.hygiene.push(item("Deodorant", 1, "Daily hygiene"));

    // Rotation basics scale with trip length, capped at a week of laundry.
    let rotation = per_day_quantity(duration_days, 7);
    categories
        .clothing
        .push(item("Underwear", rotation, "One per day up to a week of rotation"));
    categories
        .clothing
        .push(item("Socks", rotation, "One pair per day up to a week of rotation"));

    // Season-keyed clothing staples.
    match season {
        Season::Summer => {
            categories
                .clothing
                .push(item("T-Shirts", rotation, "Light tops for hot days"));
            categories.clothing.push(item(
                "Shorts",
                per_day_quantity(duration_days, 4),
                "Stay cool in warm weather",
            ));
            categories
                .clothing
                .push(item("Light Jacket", 1, "Evenings and air conditioning can be cool"));
            categories
                .hygiene
                .push(item("Sunscreen", 1, "Protect against strong summer sun"));
        }
        Season::Winter => {
            categories
                .clothing
                .push(item("Warm Coat", 1, "Primary protection against the cold"));
            categories.clothing.push(item(
                "Sweaters",
                per_day_quantity(duration_days, 3),
                "Insulating mid-layers",
            ));
            categories.clothing.push(item(
                "Thermal Underwear",
                per_day_quantity(duration_days, 5),
                "Base layers for cold days",
            ));
            categories.clothing.push(item("Gloves", 1, "Keep hands warm outdoors"));
            categories.clothing.push(item("Beanie", 1, "Heat escapes through the head"));
        }
        Season::Spring | Season::Fall => {
            categories.clothing.push(item(
                "Long-Sleeve Shirts",
                per_day_quantity(duration_days, 5),
                "Versatile tops for changeable weather",
            ));
            categories
                .clothing
                .push(item("Light Jacket", 1, "Layering for variable temperatures"));
            categories
                .other
                .push(item("Umbrella", 1, "Showers are common in the shoulder seasons"));
        }
    }

    // Travel-type additions.
    match travel_type {
        TravelType::Business => {
            categories
                .clothing
                .push(item("Business Suit", 1, "Formal meetings and client events"));
            categories
                .clothing
                .push(item("Dress Shoes", 1, "Complete the professional outfit"));
            categories.tech.push(item("Laptop", 1, "Work on the road"));
        }
        TravelType::Vacation => {
            categories
                .other
                .push(item("Camera", 1, "Capture the sights"));
            categories
                .other
                .push(item("Daypack", 1, "Carry essentials on day trips"));
        }
        TravelType::Backpacking => {
            categories
                .other
                .push(item("Backpack", 1, "Primary luggage for the route"));
            categories
                .other
                .push(item("Water Bottle", 1, "Refill instead of buying bottled water"));
            categories
                .other
                .push(item("First-Aid Kit", 1, "Basic care far from pharmacies"));
        }
    }

    debug_assert!(categories.validate().is_ok());
    categories
}

/// One per day, capped, never zero.
fn per_day_quantity(duration_days: u32, cap: i64) -> i64 {
    i64::from(duration_days).min(cap).max(1)
}

fn item(name: &str, quantity: i64, reason: &str) -> PackingItem {
    PackingItem::new(name, quantity, reason).expect("fallback item literals are valid")
}
