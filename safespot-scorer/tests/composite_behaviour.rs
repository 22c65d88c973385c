//! Behaviour coverage for composite scoring.

use chrono::Duration;
use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use safespot_core::{
    ComputedScore, Place, SafetyAttributes,
    test_support::{sample_attributes, stamp},
};
use safespot_scorer::composite_score;
use std::cell::RefCell;

#[fixture]
fn attributes() -> RefCell<SafetyAttributes> {
    RefCell::new(SafetyAttributes::neutral("p".into(), stamp()))
}

#[fixture]
fn place() -> RefCell<Place> {
    RefCell::new(Place::new("p", "Test place", Coord { x: 0.0, y: 0.0 }))
}

#[fixture]
fn result() -> RefCell<Option<ComputedScore>> {
    RefCell::new(None)
}

#[expect(
    clippy::float_arithmetic,
    reason = "tests compare floating point values"
)]
fn close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-9
}

#[given("attributes with moderate crime and good infrastructure")]
fn given_moderate(#[from(attributes)] attributes: &RefCell<SafetyAttributes>) {
    *attributes.borrow_mut() = sample_attributes("p", stamp());
}

#[given("attributes with heavy crime and no infrastructure")]
fn given_neglected(#[from(attributes)] attributes: &RefCell<SafetyAttributes>) {
    let mut attrs = attributes.borrow_mut();
    attrs.violent_crime = 100.0;
    attrs.property_crime = 100.0;
    attrs.accident_rate = 100.0;
    attrs.cctv_coverage = 0.0;
    attrs.lighting_score = 0.0;
    attrs.police_density = 0.0;
}

#[given("the attributes were collected 120 days ago")]
fn given_stale(#[from(attributes)] attributes: &RefCell<SafetyAttributes>) {
    attributes.borrow_mut().data_timestamp = Some(stamp() - Duration::days(120));
}

#[given("a place with popularity 90, experience 70 and trend 70")]
fn given_popular(#[from(place)] place: &RefCell<Place>) {
    let updated = place.borrow().clone().with_signals(90.0, 70.0, 70.0);
    *place.borrow_mut() = updated;
}

#[given("a place with popularity 10, experience 10 and trend 0")]
fn given_quiet(#[from(place)] place: &RefCell<Place>) {
    let updated = place.borrow().clone().with_signals(10.0, 10.0, 0.0);
    *place.borrow_mut() = updated;
}

#[when("I compute the composite score")]
fn when_compute(
    #[from(place)] place: &RefCell<Place>,
    #[from(attributes)] attributes: &RefCell<SafetyAttributes>,
    #[from(result)] result: &RefCell<Option<ComputedScore>>,
) {
    let score = composite_score(&place.borrow(), &attributes.borrow(), None, stamp());
    *result.borrow_mut() = Some(score);
}

#[then("the final safety score is {expected}")]
fn then_final(expected: f64, #[from(result)] result: &RefCell<Option<ComputedScore>>) {
    let result = result.borrow();
    let score = result.as_ref().expect("score computed");
    assert!(
        close(score.final_safety_score, expected),
        "final score {} != {expected}",
        score.final_safety_score
    );
}

#[then("the safety tier is {tier}")]
fn then_tier(tier: String, #[from(result)] result: &RefCell<Option<ComputedScore>>) {
    let result = result.borrow();
    let score = result.as_ref().expect("score computed");
    assert_eq!(score.safety_tier.as_str(), tier.trim_matches('"'));
}

#[then("the place rating matches the attribute score")]
#[expect(clippy::float_arithmetic, reason = "checks the rating identity")]
fn then_rating(#[from(result)] result: &RefCell<Option<ComputedScore>>) {
    let result = result.borrow();
    let score = result.as_ref().expect("score computed");
    assert!(close(
        score.place_elo,
        (1000.0 + 1400.0 * score.attribute_score).round()
    ));
}

#[then("the confidence level is {expected}")]
fn then_confidence(expected: f64, #[from(result)] result: &RefCell<Option<ComputedScore>>) {
    let result = result.borrow();
    let score = result.as_ref().expect("score computed");
    assert!(close(score.confidence_level, expected));
}

#[scenario(path = "tests/features/composite.feature", index = 0)]
fn safe_place(
    attributes: RefCell<SafetyAttributes>,
    place: RefCell<Place>,
    result: RefCell<Option<ComputedScore>>,
) {
    let _ = (attributes, place, result);
}

#[scenario(path = "tests/features/composite.feature", index = 1)]
fn unsafe_place(
    attributes: RefCell<SafetyAttributes>,
    place: RefCell<Place>,
    result: RefCell<Option<ComputedScore>>,
) {
    let _ = (attributes, place, result);
}

#[scenario(path = "tests/features/composite.feature", index = 2)]
fn stale_attributes(
    attributes: RefCell<SafetyAttributes>,
    place: RefCell<Place>,
    result: RefCell<Option<ComputedScore>>,
) {
    let _ = (attributes, place, result);
}
