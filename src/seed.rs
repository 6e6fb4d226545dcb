use tracing::info;

use crate::models::NewClass;
use crate::settings::Settings;
use crate::store::MongoStore;

const PLACEHOLDER_IMAGE: &str = "/images/placeholder.svg";

const SAMPLES: [(&str, &str, f64, &str, &str); 10] = [
    (
        "Creative Coding",
        "Hendon",
        95.0,
        "Monday",
        "Introduce coding fundamentals through storytelling and art-focused projects.",
    ),
    (
        "STEM Robotics",
        "Colindale",
        120.0,
        "Tuesday",
        "Build simple robots while learning teamwork, problem solving, and circuitry.",
    ),
    (
        "Digital Art Lab",
        "Golders Green",
        90.0,
        "Wednesday",
        "Create animations and illustrations using tablets and beginner-friendly software.",
    ),
    (
        "Mathematics Mastery",
        "Brent Cross",
        80.0,
        "Thursday",
        "Strengthen numeracy skills with games, challenges, and real-world scenarios.",
    ),
    (
        "Drama Club",
        "Mill Hill",
        85.0,
        "Friday",
        "Build confidence through improv exercises, stagecraft, and mini performances.",
    ),
    (
        "Music Ensemble",
        "Hampstead",
        110.0,
        "Monday",
        "Explore rhythm and melody using percussion, keyboards, and voice.",
    ),
    (
        "Young Scientists",
        "Finchley",
        105.0,
        "Tuesday",
        "Hands-on experiments covering chemistry, physics, and environmental science.",
    ),
    (
        "Chess Strategy",
        "Cricklewood",
        75.0,
        "Wednesday",
        "Learn tactics, openings, and sportsmanship in a supportive environment.",
    ),
    (
        "Outdoor Adventures",
        "Regents Park",
        130.0,
        "Thursday",
        "Team challenges, navigation, and nature-based learning in local parks.",
    ),
    (
        "Spanish for Kids",
        "Kilburn",
        88.0,
        "Friday",
        "Songs, games, and conversational Spanish for complete beginners.",
    ),
];

/// The catalogue loaded by the `seed` binary; every class starts with five spaces.
pub fn sample_classes() -> Vec<NewClass> {
    SAMPLES
        .iter()
        .map(|&(subject, location, price, day, description)| NewClass {
            subject: subject.to_string(),
            location: location.to_string(),
            price,
            spaces: 5,
            day: day.to_string(),
            description: description.to_string(),
            image: PLACEHOLDER_IMAGE.to_string(),
        })
        .collect()
}

/// Wipes classes and orders, then loads [`sample_classes`].
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;
    crate::init_tracing(settings.debug);

    let store = MongoStore::connect(&settings.mongodb_uri, &settings.db_name).await?;
    let seeded = store.reseed(&sample_classes()).await;
    store.close().await;

    let count = seeded?;
    info!("Seeded {count} classes and cleared previous orders.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_classes() {
        let classes = sample_classes();
        assert_eq!(classes.len(), 10);
        assert!(classes.iter().all(|class| class.spaces == 5));
        assert!(classes.iter().all(|class| class.image == PLACEHOLDER_IMAGE));
        assert_eq!(
            classes.iter().filter(|class| class.price == 95.0).count(),
            1
        );
    }
}
