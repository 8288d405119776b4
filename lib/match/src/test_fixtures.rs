//! Shared profile builders for unit tests

use peermatch_core::profile::{columns, Profile, AVAILABLE, SELECTED};

/// A complete record: every schema column present, nothing available,
/// nothing selected, all preferences neutral.
pub fn base_profile(nickname: &str, age: i64, gender: &str, region: &str) -> Profile {
    let mut p = Profile::new();
    p.insert(columns::CHILD_NICKNAME, nickname);
    p.insert(columns::CHILD_AGE, age);
    p.insert(columns::CHILD_GENDER, gender);
    p.insert(columns::CHILD_REGION, region);
    for col in columns::availability_columns() {
        p.insert(&col, "Not available");
    }
    for col in columns::interest_columns() {
        p.insert(&col, "Not selected");
    }
    p.insert(columns::PREF_INTERACTION, "Decide Later");
    p.insert(columns::PREF_OVERLAPPING_TIME, "Neutral");
    p.insert(columns::PREF_SIMILAR_AGE, "Neutral");
    p.insert(columns::PREF_SAME_GENDER, "Neutral");
    p
}

pub fn set_available(profile: &mut Profile, day: &str, time: &str) {
    profile.insert(&columns::availability_column(day, time), AVAILABLE);
}

pub fn set_interest(profile: &mut Profile, tag: &str) {
    profile.insert(&columns::interest_column(tag), SELECTED);
}

/// Set the three importance ordinals: overlapping time, similar age, same gender
pub fn set_importances(profile: &mut Profile, time: &str, age: &str, gender: &str) {
    profile.insert(columns::PREF_OVERLAPPING_TIME, time);
    profile.insert(columns::PREF_SIMILAR_AGE, age);
    profile.insert(columns::PREF_SAME_GENDER, gender);
}

/// A handful of varied, fully-populated profiles
pub fn small_population() -> Vec<Profile> {
    let mut a = base_profile("aaaaaaaaaa", 5, "Male", "Western America");
    set_available(&mut a, "Monday", "Morning");
    set_available(&mut a, "Saturday", "Afternoon");
    set_interest(&mut a, "Science");
    set_interest(&mut a, "Math");

    let mut b = base_profile("bbbbbbbbbb", 6, "Female", "Eastern America");
    set_available(&mut b, "Monday", "Morning");
    set_interest(&mut b, "Art");

    let mut c = base_profile("cccccccccc", 11, "Other", "Central America");
    set_available(&mut c, "Sunday", "Evening");
    set_interest(&mut c, "Science");

    let mut d = base_profile("dddddddddd", 9, "Prefer not to say", "Western America");
    set_available(&mut d, "Saturday", "Afternoon");
    set_available(&mut d, "Sunday", "Evening");
    set_interest(&mut d, "Coding/Game Design");

    vec![a, b, c, d]
}
