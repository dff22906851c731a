use rand::Rng;

use crate::{error::Result, models::Person, service::PersonService};

const FIRST_NAMES: [&str; 10] = [
    "Maria", "José", "Ana", "João", "Francisca", "Antônio", "Luiza", "Carlos", "Adriana", "Paulo",
];
const LAST_NAMES: [&str; 10] = [
    "da Silva",
    "dos Santos",
    "Oliveira",
    "Souza",
    "Rodrigues",
    "Ferreira",
    "Alves",
    "Pereira",
    "Lima",
    "Gomes",
];
const CITIES: [(&str, &str); 5] = [
    ("Aracaju", "SE"),
    ("Teresina", "PI"),
    ("Itabaiana", "SE"),
    ("Salvador", "BA"),
    ("Recife", "PE"),
];

/// A plausible collector with random name, address and eight-digit postal
/// code. The name always satisfies the form's length rule.
pub fn random_person(rng: &mut impl Rng) -> Person {
    let first_name = FIRST_NAMES[rng.random_range(0..FIRST_NAMES.len())];
    let last_name = LAST_NAMES[rng.random_range(0..LAST_NAMES.len())];
    let (city, state) = CITIES[rng.random_range(0..CITIES.len())];
    let name = format!("{first_name} {last_name}");

    Person {
        email: Some(format!(
            "{}.{}@recolhaki.com.br",
            first_name.to_lowercase(),
            rng.random_range(1..10_000)
        )),
        street: Some(format!("Rua {}", LAST_NAMES[rng.random_range(0..LAST_NAMES.len())])),
        number: rng.random_range(1..=2000),
        city: Some(city.to_string()),
        state: Some(state.to_string()),
        ..Person::new(&name, rng.random_range(10_000_000..=99_999_999))
    }
}

pub async fn seed(service: &dyn PersonService, count: u32) -> Result<u64> {
    tracing::info!("Registering {count} random collectors");

    let start = std::time::Instant::now();

    let people: Vec<Person> = {
        let mut rng = rand::rng();
        (0..count).map(|_| random_person(&mut rng)).collect()
    };
    let written = service.insert_many(people).await?;

    tracing::info!("{written} collectors registered in {:?}", start.elapsed());

    Ok(written)
}
