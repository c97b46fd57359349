//! Guest list with per-day meal availability.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use vivaha_core::{position_of, DomainError, DomainResult, Entity, GuestId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Meal {
    Breakfast,
    Lunch,
    Dinner,
}

/// Meals a guest attends, keyed by calendar date.
pub type Availability = BTreeMap<NaiveDate, BTreeSet<Meal>>;

/// Upper bound on the people a single guest entry may stand for.
pub const MAX_GUEST_COUNT: u32 = 10_000;

fn one() -> u32 {
    1
}

/// A guest entry; `count` is the number of people it stands for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    id: GuestId,
    name: String,
    #[serde(default = "one")]
    count: u32,
    #[serde(default)]
    reception_count: u32,
    #[serde(default)]
    notes: String,
    #[serde(default)]
    room: String,
    #[serde(default)]
    availability: Availability,
}

impl Guest {
    pub fn id_typed(&self) -> &GuestId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn reception_count(&self) -> u32 {
        self.reception_count
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn availability(&self) -> &Availability {
        &self.availability
    }

    fn apply(&mut self, details: GuestDetails) -> DomainResult<()> {
        if let Some(name) = details.name {
            self.name = validate_name(name)?;
        }
        if let Some(count) = details.count {
            if count == 0 {
                return Err(DomainError::invalid_input("guest count must be at least 1"));
            }
            if count > MAX_GUEST_COUNT {
                return Err(DomainError::invalid_input(format!(
                    "guest count must not exceed {MAX_GUEST_COUNT}"
                )));
            }
            self.count = count;
        }
        if let Some(reception_count) = details.reception_count {
            if reception_count > MAX_GUEST_COUNT {
                return Err(DomainError::invalid_input(format!(
                    "reception count must not exceed {MAX_GUEST_COUNT}"
                )));
            }
            self.reception_count = reception_count;
        }
        if let Some(notes) = details.notes {
            self.notes = notes;
        }
        if let Some(room) = details.room {
            self.room = room;
        }
        if let Some(availability) = details.availability {
            self.availability = availability;
        }
        Ok(())
    }
}

impl Entity for Guest {
    type Id = GuestId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn validate_name(name: String) -> DomainResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::invalid_input("guest name is required"));
    }
    Ok(trimmed.to_string())
}

/// Guest fields supplied by a create or update request.
///
/// On update, omitted fields keep their current value. On create, `name` is
/// required and the rest default (`count = 1`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GuestDetails {
    pub name: Option<String>,
    pub count: Option<u32>,
    pub reception_count: Option<u32>,
    pub notes: Option<String>,
    pub room: Option<String>,
    pub availability: Option<Availability>,
}

/// Insertion-ordered guest list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuestList {
    guests: Vec<Guest>,
}

impl GuestList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn guests(&self) -> &[Guest] {
        &self.guests
    }

    pub fn get(&self, id: &GuestId) -> Option<&Guest> {
        position_of(&self.guests, id).map(|i| &self.guests[i])
    }

    pub fn create(&mut self, details: GuestDetails) -> DomainResult<Guest> {
        let name = details
            .name
            .clone()
            .ok_or_else(|| DomainError::invalid_input("guest name is required"))?;
        let mut guest = Guest {
            id: self.fresh_id(),
            name: validate_name(name)?,
            count: 1,
            reception_count: 0,
            notes: String::new(),
            room: String::new(),
            availability: Availability::new(),
        };
        guest.apply(details)?;
        self.guests.push(guest.clone());
        Ok(guest)
    }

    pub fn update(&mut self, id: &GuestId, details: GuestDetails) -> DomainResult<Guest> {
        let index = self.index_of(id)?;
        // Apply to a copy so a rejected field leaves the stored guest intact.
        let mut guest = self.guests[index].clone();
        guest.apply(details)?;
        self.guests[index] = guest.clone();
        Ok(guest)
    }

    pub fn delete(&mut self, id: &GuestId) -> DomainResult<Guest> {
        let index = self.index_of(id)?;
        Ok(self.guests.remove(index))
    }

    pub fn summary(&self) -> GuestSummary {
        GuestSummary::compute(&self.guests)
    }

    fn index_of(&self, id: &GuestId) -> DomainResult<usize> {
        position_of(&self.guests, id).ok_or_else(|| DomainError::not_found(format!("guest {id}")))
    }

    fn fresh_id(&self) -> GuestId {
        loop {
            let id = GuestId::generate();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

/// Headcount per meal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MealCounts {
    pub breakfast: u32,
    pub lunch: u32,
    pub dinner: u32,
    pub total: u32,
}

impl MealCounts {
    fn add(&mut self, meal: Meal, people: u32) {
        match meal {
            Meal::Breakfast => self.breakfast = self.breakfast.saturating_add(people),
            Meal::Lunch => self.lunch = self.lunch.saturating_add(people),
            Meal::Dinner => self.dinner = self.dinner.saturating_add(people),
        }
        self.total = self.total.saturating_add(people);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeakDay {
    pub date: NaiveDate,
    pub guests: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestSummary {
    pub total_guests: u32,
    pub reception_guests: u32,
    pub meals_by_date: BTreeMap<NaiveDate, MealCounts>,
    pub meal_totals: MealCounts,
    pub peak_day: Option<PeakDay>,
}

// Stored documents are not bound by `MAX_GUEST_COUNT`, so sums saturate.
fn saturating_sum(values: impl Iterator<Item = u32>) -> u32 {
    values.fold(0, u32::saturating_add)
}

impl GuestSummary {
    pub fn compute(guests: &[Guest]) -> Self {
        let mut meals_by_date: BTreeMap<NaiveDate, MealCounts> = BTreeMap::new();
        let mut meal_totals = MealCounts::default();
        let mut day_heads: BTreeMap<NaiveDate, u32> = BTreeMap::new();

        for guest in guests {
            for (date, meals) in &guest.availability {
                if meals.is_empty() {
                    continue;
                }
                let heads = day_heads.entry(*date).or_insert(0);
                *heads = heads.saturating_add(guest.count);
                let counts = meals_by_date.entry(*date).or_default();
                for meal in meals {
                    counts.add(*meal, guest.count);
                    meal_totals.add(*meal, guest.count);
                }
            }
        }

        // Earliest date wins ties (strict comparison over ascending dates).
        let mut peak_day: Option<PeakDay> = None;
        for (date, guests) in day_heads {
            if guests > peak_day.map_or(0, |p| p.guests) {
                peak_day = Some(PeakDay { date, guests });
            }
        }

        Self {
            total_guests: saturating_sum(guests.iter().map(|g| g.count)),
            reception_guests: saturating_sum(guests.iter().map(|g| g.reception_count)),
            meals_by_date,
            meal_totals,
            peak_day,
        }
    }
}
