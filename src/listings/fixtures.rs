use crate::models::{NewProperty, Property, PropertyTag, PropertyType};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;

/// Seeded listings may be backdated by up to this many days
pub const SEED_BACKDATE_DAYS: i64 = 30;

/// Bundled listings used when no persisted collection exists.
///
/// Every record carries `published_at` as given; the store restamps them when seeding.
pub fn seed_properties(published_at: DateTime<Utc>) -> Vec<Property> {
    let listing = |id: &str, draft: NewProperty| Property::from_new(id.to_string(), published_at, draft);

    vec![
        listing(
            "1",
            NewProperty {
                title: "Modern Apartment in Shankar Nagar".to_string(),
                price: 4_500_000,
                location: "Shankar Nagar, Raipur".to_string(),
                tags: vec![PropertyTag::New, PropertyTag::Trending],
                image: "/images/properties/shankar-nagar-1.jpg".to_string(),
                images: strings(&[
                    "/images/properties/shankar-nagar-1.jpg",
                    "/images/properties/shankar-nagar-2.jpg",
                ]),
                description: "Bright 3 BHK apartment close to schools and the market, with covered parking.".to_string(),
                bedrooms: 3,
                bathrooms: 2,
                area: 1450,
                property_type: PropertyType::Apartment,
                amenities: strings(&["Parking", "Security", "Elevator", "Power Backup"]),
            },
        ),
        listing(
            "2",
            NewProperty {
                title: "Luxury Villa near Telibandha Lake".to_string(),
                price: 12_500_000,
                location: "Telibandha, Raipur".to_string(),
                tags: vec![PropertyTag::FastFilling],
                image: "/images/properties/telibandha-1.jpg".to_string(),
                images: strings(&[
                    "/images/properties/telibandha-1.jpg",
                    "/images/properties/telibandha-2.jpg",
                    "/images/properties/telibandha-3.jpg",
                ]),
                description: "Independent villa with a private garden and pool, minutes from Marine Drive.".to_string(),
                bedrooms: 5,
                bathrooms: 4,
                area: 3800,
                property_type: PropertyType::Villa,
                amenities: strings(&["Swimming Pool", "Garden", "Parking", "Security", "Luxury Fittings"]),
            },
        ),
        listing(
            "3",
            NewProperty {
                title: "Family House in Vyapar Vihar".to_string(),
                price: 6_800_000,
                location: "Vyapar Vihar, Bilaspur".to_string(),
                tags: vec![PropertyTag::SoldOut],
                image: "/images/properties/vyapar-vihar-1.jpg".to_string(),
                images: strings(&["/images/properties/vyapar-vihar-1.jpg"]),
                description: "Two-storey house on a quiet lane with a terrace garden.".to_string(),
                bedrooms: 4,
                bathrooms: 3,
                area: 2200,
                property_type: PropertyType::House,
                amenities: strings(&["Terrace Garden", "Parking", "Peaceful Location"]),
            },
        ),
        listing(
            "4",
            NewProperty {
                title: "Skyline Penthouse, Naya Raipur".to_string(),
                price: 18_000_000,
                location: "Sector 24, Naya Raipur".to_string(),
                tags: vec![PropertyTag::New, PropertyTag::FastFilling],
                image: "/images/properties/naya-raipur-1.jpg".to_string(),
                images: strings(&[
                    "/images/properties/naya-raipur-1.jpg",
                    "/images/properties/naya-raipur-2.jpg",
                ]),
                description: "Top-floor penthouse with wraparound terrace and city views.".to_string(),
                bedrooms: 4,
                bathrooms: 4,
                area: 3200,
                property_type: PropertyType::Penthouse,
                amenities: strings(&["City View", "Gym", "Concierge", "Premium Fittings", "Elevator"]),
            },
        ),
        listing(
            "5",
            NewProperty {
                title: "Riverside Cottage on the Kharun".to_string(),
                price: 3_200_000,
                location: "Mahadev Ghat, Raipur".to_string(),
                tags: vec![PropertyTag::Trending],
                image: "/images/properties/kharun-1.jpg".to_string(),
                images: strings(&["/images/properties/kharun-1.jpg", "/images/properties/kharun-2.jpg"]),
                description: "Compact cottage with river frontage and plenty of natural light.".to_string(),
                bedrooms: 2,
                bathrooms: 1,
                area: 950,
                property_type: PropertyType::Cottage,
                amenities: strings(&["River View", "Garden", "Natural Light"]),
            },
        ),
        listing(
            "6",
            NewProperty {
                title: "Executive Suite in Civic Center".to_string(),
                price: 2_750_000,
                location: "Civic Center, Bhilai".to_string(),
                tags: vec![PropertyTag::New],
                image: "/images/properties/civic-center-1.jpg".to_string(),
                images: strings(&["/images/properties/civic-center-1.jpg"]),
                description: "Furnished studio suite in the heart of Bhilai's business district.".to_string(),
                bedrooms: 1,
                bathrooms: 1,
                area: 620,
                property_type: PropertyType::Suite,
                amenities: strings(&["Premium Location", "Security", "Power Backup"]),
            },
        ),
    ]
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Give each record a random publish time within the last [`SEED_BACKDATE_DAYS`] days
pub fn backdate(properties: &mut [Property], now: DateTime<Utc>) {
    let mut rng = rand::thread_rng();
    let window_secs = SEED_BACKDATE_DAYS * 24 * 60 * 60;
    for property in properties {
        let offset = rng.gen_range(0..window_secs);
        property.published_at = now - Duration::seconds(offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn fixture_ids_are_unique() {
        let seeds = seed_properties(Utc::now());
        let ids: HashSet<_> = seeds.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), seeds.len());
        assert!(seeds.iter().all(|p| !p.title.is_empty()));
    }

    #[test]
    fn backdated_times_fall_inside_window() {
        let now = Utc::now();
        let mut seeds = seed_properties(now);
        backdate(&mut seeds, now);

        let earliest = now - Duration::days(SEED_BACKDATE_DAYS);
        for property in &seeds {
            assert!(property.published_at <= now);
            assert!(property.published_at > earliest);
        }
    }
}
