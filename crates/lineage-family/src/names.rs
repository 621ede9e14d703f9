//! Name pools per language.

use lineage_types::{Gender, Language};
use rand::Rng;

use crate::random::pick;

const EN_MALE: &[&str] = &[
    "James", "John", "Robert", "Michael", "William", "David", "Richard", "Joseph", "Thomas",
    "Charles", "Daniel", "Matthew", "Anthony", "Mark", "Steven", "Andrew", "Joshua", "Kevin",
    "Brian", "George",
];

const EN_FEMALE: &[&str] = &[
    "Mary", "Patricia", "Jennifer", "Linda", "Elizabeth", "Barbara", "Susan", "Jessica", "Sarah",
    "Karen", "Nancy", "Lisa", "Emily", "Emma", "Olivia", "Sophia", "Grace", "Chloe", "Hannah",
    "Lucy",
];

const EN_SURNAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Miller", "Davis", "Wilson", "Anderson",
    "Taylor", "Thomas", "Moore", "Martin", "Jackson", "Thompson", "White", "Harris", "Clark",
    "Lewis", "Walker",
];

const VI_MALE: &[&str] = &[
    "Anh", "Bảo", "Cường", "Dũng", "Đức", "Hải", "Hiếu", "Hoàng", "Hùng", "Khang", "Khoa", "Long",
    "Minh", "Nam", "Phúc", "Quân", "Sơn", "Thắng", "Trung", "Tuấn",
];

const VI_FEMALE: &[&str] = &[
    "An", "Chi", "Diệp", "Giang", "Hà", "Hạnh", "Hoa", "Hương", "Lan", "Linh", "Mai", "My",
    "Ngọc", "Nhung", "Phương", "Quỳnh", "Thảo", "Trang", "Vy", "Yến",
];

const VI_SURNAMES: &[&str] = &[
    "Nguyễn", "Trần", "Lê", "Phạm", "Hoàng", "Huỳnh", "Phan", "Vũ", "Võ", "Đặng", "Bùi", "Đỗ",
    "Hồ", "Ngô", "Dương", "Lý",
];

const PET_NAMES: &[&str] = &[
    "Buddy", "Luna", "Max", "Bella", "Milo", "Coco", "Mochi", "Kiki", "Lucky", "Bông",
];

fn draw(rng: &mut (impl Rng + ?Sized), pool: &[&str]) -> String {
    pick(rng, pool).map_or_else(String::new, |name| (*name).to_owned())
}

/// A random given name.
pub fn first_name(rng: &mut (impl Rng + ?Sized), language: Language, gender: Gender) -> String {
    let pool = match (language, gender) {
        (Language::En, Gender::Male) => EN_MALE,
        (Language::En, Gender::Female) => EN_FEMALE,
        (Language::Vi, Gender::Male) => VI_MALE,
        (Language::Vi, Gender::Female) => VI_FEMALE,
    };
    draw(rng, pool)
}

/// A random family name.
pub fn surname(rng: &mut (impl Rng + ?Sized), language: Language) -> String {
    let pool = match language {
        Language::En => EN_SURNAMES,
        Language::Vi => VI_SURNAMES,
    };
    draw(rng, pool)
}

/// A random pet name.
pub fn pet_name(rng: &mut (impl Rng + ?Sized)) -> String {
    draw(rng, PET_NAMES)
}
