//! Sample food-delivery data generator

use crate::error::Result;
use crate::model::{
    Customer, Delivery, DeliveryStatus, NewOrder, OrderStatus, Restaurant, Rider,
};
use crate::relation::scalar::round2;
use crate::store::{write_parquet, FoodStore};
use chrono::{Duration, NaiveDate, NaiveTime};
use rand::prelude::*;
use std::path::Path;
use tracing::info;

const CITIES: [&str; 6] = ["Mumbai", "Delhi", "Bengaluru", "Hyderabad", "Chennai", "Pune"];

const RESTAURANT_NAMES: [&str; 12] = [
    "Spice Route",
    "Tandoor House",
    "Biryani Blues",
    "Dosa Corner",
    "Curry Leaf",
    "Chaat Street",
    "Royal Thali",
    "Coastal Kitchen",
    "Kebab Junction",
    "Punjabi Dhaba",
    "Udupi Delight",
    "Mughal Darbar",
];

const DISHES: [&str; 15] = [
    "Chicken Biryani",
    "Paneer Butter Masala",
    "Masala Dosa",
    "Butter Chicken",
    "Dal Makhani",
    "Chole Bhature",
    "Veg Thali",
    "Mutton Rogan Josh",
    "Fish Curry",
    "Pav Bhaji",
    "Aloo Paratha",
    "Hyderabadi Haleem",
    "Idli Sambar",
    "Chicken Tikka",
    "Gulab Jamun",
];

const OPENING_HOURS: [&str; 3] = ["9:00 AM - 11:00 PM", "11:00 AM - 11:30 PM", "7:00 AM - 10:00 PM"];

const FIRST_NAMES: [&str; 10] = [
    "Aarav", "Priya", "Rohan", "Ananya", "Vikram", "Sneha", "Karan", "Isha", "Rahul", "Neha",
];

const LAST_NAMES: [&str; 8] = [
    "Sharma", "Verma", "Iyer", "Reddy", "Gupta", "Nair", "Kapoor", "Singh",
];

/// The customer the per-customer reports look up by default
pub const FEATURED_CUSTOMER: &str = "Arjun Mehta";

/// Row counts for a generated dataset
#[derive(Debug, Clone, Copy)]
pub struct SampleSize {
    pub restaurants: usize,
    pub customers: usize,
    pub riders: usize,
    pub orders: usize,
}

impl Default for SampleSize {
    fn default() -> Self {
        Self {
            restaurants: 20,
            customers: 200,
            riders: 30,
            orders: 10_000,
        }
    }
}

/// Deterministic generator. The same seed and size always produce the
/// same dataset.
///
/// The data is shaped so that every report has something to show:
/// - about 40% of orders belong to the first four customers, so the
///   order-count and spend thresholds are crossed
/// - the last 10% of customers only order in the first year (churn)
/// - the last restaurant only receives orders in the first year
/// - about 8% of orders have no delivery row and about 1% no amount
pub struct SampleGenerator {
    size: SampleSize,
    rng: StdRng,
}

impl SampleGenerator {
    pub fn new(size: SampleSize) -> Self {
        Self {
            size,
            rng: StdRng::seed_from_u64(42),
        }
    }

    pub fn with_seed(size: SampleSize, seed: u64) -> Self {
        Self {
            size,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generate every table into a new store
    pub fn generate(&mut self) -> Result<FoodStore> {
        let mut store = FoodStore::new();

        // Referenced tables first
        self.generate_restaurants(&mut store)?;
        self.generate_customers(&mut store)?;
        self.generate_riders(&mut store)?;
        self.generate_orders(&mut store)?;

        info!(
            restaurants = store.restaurants().len(),
            customers = store.customers().len(),
            riders = store.riders().len(),
            orders = store.orders().len(),
            deliveries = store.deliveries().len(),
            "generated sample data"
        );
        Ok(store)
    }

    /// Generate every table and write it to `output_dir` as Parquet
    pub fn generate_to_parquet(&mut self, output_dir: &Path) -> Result<FoodStore> {
        let store = self.generate()?;
        write_parquet(&store, output_dir)?;
        Ok(store)
    }

    fn random_date(&mut self, from: NaiveDate, days: i64) -> NaiveDate {
        from + Duration::days(self.rng.gen_range(0..days))
    }

    fn generate_restaurants(&mut self, store: &mut FoodStore) -> Result<()> {
        for i in 0..self.size.restaurants {
            let base = RESTAURANT_NAMES[i % RESTAURANT_NAMES.len()];
            let name = if i < RESTAURANT_NAMES.len() {
                base.to_string()
            } else {
                format!("{} {}", base, i / RESTAURANT_NAMES.len() + 1)
            };
            store.insert_restaurant(Restaurant::new(
                (i + 1) as i64,
                name,
                CITIES[i % CITIES.len()],
                OPENING_HOURS[i % OPENING_HOURS.len()],
            ))?;
        }
        Ok(())
    }

    fn generate_customers(&mut self, store: &mut FoodStore) -> Result<()> {
        let start = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or_default();
        for i in 0..self.size.customers {
            let name = if i == 0 {
                FEATURED_CUSTOMER.to_string()
            } else {
                format!(
                    "{} {} {}",
                    FIRST_NAMES[i % FIRST_NAMES.len()],
                    LAST_NAMES[(i / FIRST_NAMES.len()) % LAST_NAMES.len()],
                    i
                )
            };
            let reg_date = self.random_date(start, 365);
            store.insert_customer(Customer::new((i + 1) as i64, name, reg_date))?;
        }
        Ok(())
    }

    fn generate_riders(&mut self, store: &mut FoodStore) -> Result<()> {
        let start = NaiveDate::from_ymd_opt(2021, 6, 1).unwrap_or_default();
        for i in 0..self.size.riders {
            let name = format!("Rider {}", FIRST_NAMES[i % FIRST_NAMES.len()]);
            let sign_up = self.random_date(start, 540);
            store.insert_rider(Rider::new((i + 1) as i64, name, sign_up))?;
        }
        Ok(())
    }

    fn generate_orders(&mut self, store: &mut FoodStore) -> Result<()> {
        let SampleSize {
            restaurants,
            customers,
            riders,
            orders,
        } = self.size;
        if orders == 0 || restaurants == 0 || customers == 0 {
            return Ok(());
        }

        let first_year = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default();
        let regulars = customers.min(4);
        let churned_from = customers - customers / 10;
        let closing_restaurant = restaurants;

        for i in 0..orders {
            let order_id = (i + 1) as i64;

            let customer = if self.rng.gen_bool(0.4) {
                self.rng.gen_range(1..=regulars)
            } else {
                self.rng.gen_range(1..=customers)
            };
            let restaurant = self.rng.gen_range(1..=restaurants);

            let first_year_only = customer > churned_from
                || (restaurants > 1 && restaurant == closing_restaurant);
            let order_date = if first_year_only {
                self.random_date(first_year, 365)
            } else {
                self.random_date(first_year, 731)
            };
            let order_time = self.random_order_time();

            let status = match self.rng.gen_range(0..100) {
                0..=79 => OrderStatus::Delivered,
                80..=91 => OrderStatus::Cancelled,
                _ => OrderStatus::Pending,
            };

            let mut order = NewOrder::new(
                order_id,
                customer as i64,
                restaurant as i64,
                DISHES[self.rng.gen_range(0..DISHES.len())],
            )
            .placed_at(order_date, order_time)
            .status(status);
            if !self.rng.gen_bool(0.01) {
                order = order.amount(round2(self.rng.gen_range(120.0..1800.0)));
            }
            store.insert_order(order)?;

            if riders > 0 && self.rng.gen_bool(0.92) {
                let delivered = self.rng.gen_bool(0.9);
                let (delivery_status, delivery_time) = if delivered {
                    let minutes = self.rng.gen_range(15..=60);
                    let (time, _) = order_time.overflowing_add_signed(Duration::minutes(minutes));
                    (DeliveryStatus::Delivered, Some(time))
                } else {
                    (DeliveryStatus::NotDelivered, None)
                };
                store.insert_delivery(Delivery::new(
                    order_id,
                    order_id,
                    self.rng.gen_range(1..=riders) as i64,
                    delivery_status,
                    delivery_time,
                ))?;
            }
        }
        Ok(())
    }

    /// Order times cluster around lunch and dinner
    fn random_order_time(&mut self) -> NaiveTime {
        let hour = match self.rng.gen_range(0..10) {
            0..=3 => self.rng.gen_range(12..15),
            4..=7 => self.rng.gen_range(19..23),
            _ => self.rng.gen_range(0..24),
        };
        NaiveTime::from_hms_opt(hour, self.rng.gen_range(0..60), self.rng.gen_range(0..60))
            .unwrap_or_default()
    }
}

impl Default for SampleGenerator {
    fn default() -> Self {
        Self::new(SampleSize::default())
    }
}
