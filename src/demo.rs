// src/demo.rs

//! Demonstration data for local development
//!
//! `DemoData` fills the database with three named fixture users, generated
//! users, tags, recipes with ingredients, comments, ratings, follows and
//! favourites. [`unseed`] removes all of it again, keeping staff accounts.
//! Only the `potluck seed` and `potluck unseed` commands use this module.

use crate::db::models::{
    Comment, Favourite, Follow, Rating, Recipe, RecipeIngredient, Tag, TagKind, Unit, User,
};
use crate::error::{Error, Result};
use crate::progress::ProgressTracker;
use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rusqlite::{Connection, Transaction};
use tracing::{debug, info, warn};

/// (username, email, first name, last name)
pub const FIXTURE_USERS: [(&str, &str, &str, &str); 3] = [
    ("@johndoe", "john.doe@example.org", "John", "Doe"),
    ("@janedoe", "jane.doe@example.org", "Jane", "Doe"),
    ("@charlie", "charlie.johnson@example.org", "Charlie", "Johnson"),
];

const FIXTURE_RECIPES: [(&str, [&str; 3]); 3] = [
    ("@johndoe", ["Chocolate Cake", "Spaghetti Carbonara", "Chicken Curry"]),
    ("@janedoe", ["Vegetable Stir Fry", "Beef Stew", "Caesar Salad"]),
    ("@charlie", ["Fish and Chips", "Chili Con Carne", "Pancakes"]),
];

const DIETARY_TAGS: [&str; 7] = [
    "Vegan", "Vegetarian", "Gluten-Free", "Dairy-Free", "Nut-Free", "Halal", "Kosher",
];

const CUISINE_TAGS: [&str; 10] = [
    "Italian", "Mexican", "Chinese", "Japanese", "Indian", "French", "Thai", "Mediterranean",
    "American", "British",
];

const FIRST_NAMES: [&str; 24] = [
    "Amelia", "Oliver", "Isla", "George", "Ava", "Harry", "Mia", "Noah", "Freya", "Jack",
    "Lily", "Oscar", "Grace", "Leo", "Ivy", "Arthur", "Rosie", "Alfie", "Ella", "Henry",
    "Poppy", "Theo", "Evie", "Finley",
];

const LAST_NAMES: [&str; 24] = [
    "Smith", "Jones", "Taylor", "Brown", "Williams", "Wilson", "Evans", "Thomas", "Roberts",
    "Walker", "Wright", "Thompson", "White", "Hughes", "Edwards", "Green", "Hall", "Wood",
    "Harris", "Clarke", "Patel", "Khan", "Lewis", "Turner",
];

const NAME_PREFIXES: [&str; 10] = [
    "Spicy", "Sweet", "Creamy", "Crispy", "Tender", "Flavourful", "Aromatic", "Savoury",
    "Tangy", "Zesty",
];

const NAME_DISHES: [&str; 14] = [
    "Pasta", "Rice", "Soup", "Salad", "Stew", "Curry", "Stir Fry", "Roast", "Bake", "Grill",
    "Cake", "Pie", "Bread", "Chili",
];

const NAME_ENDINGS: [&str; 10] = [
    "with Chicken", "and Vegetables", "with Beef", "and Herbs", "with Garlic",
    "in Tomato Sauce", "with Cheese", "and Mushrooms", "with Onions", "and Peppers",
];

const INGREDIENTS: [&str; 35] = [
    "flour", "sugar", "butter", "eggs", "milk", "salt", "pepper", "onions", "garlic",
    "tomatoes", "chicken", "beef", "pork", "fish", "rice", "pasta", "cheese", "olive oil",
    "chocolate", "vanilla", "baking powder", "yeast", "carrots", "potatoes", "bell peppers",
    "mushrooms", "spinach", "lettuce", "lemon", "lime", "herbs", "spices", "soy sauce",
    "vinegar", "broth",
];

const WORDS: [&str; 32] = [
    "stir", "gently", "until", "golden", "the", "sauce", "simmer", "over", "low", "heat",
    "season", "taste", "serve", "warm", "with", "fresh", "bread", "chop", "finely", "and",
    "add", "to", "pan", "bake", "for", "minutes", "rest", "before", "slicing", "lovely",
    "recipe", "crunchy",
];

/// Builder for a demo data set
#[derive(Debug, Clone)]
pub struct DemoData {
    user_count: usize,
    recipe_count: usize,
    seed: Option<u64>,
}

impl Default for DemoData {
    fn default() -> Self {
        Self {
            user_count: 200,
            recipe_count: 300,
            seed: None,
        }
    }
}

/// How many rows a seeding run created
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub recipes: usize,
    pub ingredients: usize,
    pub comments: usize,
    pub ratings: usize,
    pub follows: usize,
    pub favourites: usize,
}

impl DemoData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Target total number of users, fixtures included
    pub fn users(mut self, count: usize) -> Self {
        self.user_count = count;
        self
    }

    /// Target total number of recipes
    pub fn recipes(mut self, count: usize) -> Self {
        self.recipe_count = count;
        self
    }

    /// Make the run reproducible
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Fill the database in a single transaction
    pub fn run(&self, conn: &mut Connection, progress: &dyn ProgressTracker) -> Result<SeedSummary> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let summary = crate::db::transaction(conn, |tx| {
            let mut summary = SeedSummary::default();
            let mut seeder = Seeder {
                tx,
                rng: &mut rng,
                progress,
                summary: &mut summary,
            };
            seeder.users(self.user_count)?;
            seeder.tags()?;
            let new_recipes = seeder.recipes(self.recipe_count)?;
            seeder.ingredients(&new_recipes)?;
            seeder.comments()?;
            seeder.ratings()?;
            seeder.follows()?;
            seeder.favourites()?;
            Ok(summary)
        })?;

        progress.finish_with_message("Seeding complete");
        info!(
            "Seeded {} users, {} recipes, {} ingredients, {} comments, {} ratings, {} follows, {} favourites",
            summary.users,
            summary.recipes,
            summary.ingredients,
            summary.comments,
            summary.ratings,
            summary.follows,
            summary.favourites
        );
        Ok(summary)
    }
}

struct Seeder<'a, 'tx> {
    tx: &'a Transaction<'tx>,
    rng: &'a mut StdRng,
    progress: &'a dyn ProgressTracker,
    summary: &'a mut SeedSummary,
}

impl Seeder<'_, '_> {
    fn users(&mut self, target: usize) -> Result<()> {
        self.progress.start_stage("Seeding users", target as u64);

        for (username, email, first, last) in FIXTURE_USERS {
            self.try_create_user(username, email, first, last)?;
        }

        // Name pairs run out eventually, so give up after enough collisions
        let mut attempts = 0;
        while (User::count(self.tx)? as usize) < target && attempts < target * 20 {
            attempts += 1;
            let first = pick(self.rng, &FIRST_NAMES);
            let last = pick(self.rng, &LAST_NAMES);
            let mut username = format!("@{}{}", first, last).to_lowercase();
            let mut email = format!("{}.{}@example.org", first, last).to_lowercase();
            if attempts > FIRST_NAMES.len() * LAST_NAMES.len() {
                username.push_str(&attempts.to_string());
                email = format!("{}.{}{}@example.org", first, last, attempts).to_lowercase();
            }
            self.try_create_user(&username, &email, first, last)?;
        }

        let total = User::count(self.tx)? as usize;
        if total < target {
            warn!("Only {} of {} users could be generated", total, target);
        }
        Ok(())
    }

    fn try_create_user(&mut self, username: &str, email: &str, first: &str, last: &str) -> Result<()> {
        let mut user = User::new(
            username.to_string(),
            first.to_string(),
            last.to_string(),
            email.to_string(),
        );
        match user.insert(self.tx) {
            Ok(_) => {
                self.summary.users += 1;
                self.progress.increment(1);
                Ok(())
            }
            Err(Error::AlreadyExists(_)) => {
                debug!("Skipping existing user {}", username);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn tags(&mut self) -> Result<()> {
        for name in DIETARY_TAGS {
            Tag::get_or_create(self.tx, TagKind::Dietary, name)?;
        }
        for name in CUISINE_TAGS {
            Tag::get_or_create(self.tx, TagKind::Cuisine, name)?;
        }
        Ok(())
    }

    /// Create recipes up to `target`, fixture recipes first
    fn recipes(&mut self, target: usize) -> Result<Vec<i64>> {
        self.progress.start_stage("Seeding recipes", target as u64);
        let mut created = Vec::new();
        let mut existing = Recipe::list_all(self.tx)?.len();

        for (username, names) in FIXTURE_RECIPES {
            let Some(author) = User::find_by_username(self.tx, username)? else {
                continue;
            };
            let Some(author_id) = author.id else {
                continue;
            };
            let owned: Vec<String> = Recipe::find_by_author(self.tx, author_id)?
                .into_iter()
                .map(|r| r.recipe_name)
                .collect();
            for name in names {
                if existing >= target {
                    return Ok(created);
                }
                if !owned.iter().any(|n| n == name) {
                    created.push(self.create_recipe(author_id, name)?);
                    existing += 1;
                }
            }
        }

        let author_ids: Vec<i64> = User::list_all(self.tx)?.iter().filter_map(|u| u.id).collect();
        if author_ids.is_empty() {
            return Ok(created);
        }
        while existing < target {
            let author_id = *pick(self.rng, &author_ids);
            let name = format!(
                "{} {} {}",
                pick(self.rng, &NAME_PREFIXES),
                pick(self.rng, &NAME_DISHES),
                pick(self.rng, &NAME_ENDINGS)
            );
            created.push(self.create_recipe(author_id, &name)?);
            existing += 1;
        }
        Ok(created)
    }

    fn create_recipe(&mut self, author_id: i64, name: &str) -> Result<i64> {
        let steps: Vec<String> = (0..self.rng.gen_range(3..=8))
            .map(|_| sentence(self.rng, 5, 10))
            .collect();

        let mut recipe = Recipe::new(author_id, name.to_string(), sentence(self.rng, 12, 30));
        recipe.difficulty = self.rng.gen_range(1..=5);
        recipe.instructions = steps.join("\n");
        let age = Duration::days(self.rng.gen_range(0..=365));
        recipe.publication_date = (Utc::now() - age).date_naive().format("%Y-%m-%d").to_string();
        let recipe_id = recipe.insert(self.tx)?;

        let dietary = Tag::list_all(self.tx, TagKind::Dietary)?;
        let cuisine = Tag::list_all(self.tx, TagKind::Cuisine)?;
        for (kind, tags, max) in [(TagKind::Dietary, dietary, 3), (TagKind::Cuisine, cuisine, 2)] {
            let count = self.rng.gen_range(0..=max.min(tags.len()));
            let ids: Vec<i64> = tags
                .choose_multiple(self.rng, count)
                .map(|t| t.id)
                .collect();
            Tag::set_for_recipe(self.tx, kind, recipe_id, &ids)?;
        }

        self.summary.recipes += 1;
        self.progress.increment(1);
        Ok(recipe_id)
    }

    fn ingredients(&mut self, recipe_ids: &[i64]) -> Result<()> {
        self.progress.start_stage("Seeding ingredients", recipe_ids.len() as u64);
        for &recipe_id in recipe_ids {
            let mut rows: Vec<RecipeIngredient> = (0..self.rng.gen_range(3..=8))
                .map(|_| {
                    RecipeIngredient::new(
                        recipe_id,
                        pick(self.rng, &INGREDIENTS).to_string(),
                        self.rng.gen_range(1..=500),
                        *pick(self.rng, &Unit::ALL),
                    )
                })
                .collect();
            RecipeIngredient::replace_for_recipe(self.tx, recipe_id, &mut rows)?;
            self.summary.ingredients += rows.len();
            self.progress.increment(1);
        }
        Ok(())
    }

    fn comments(&mut self) -> Result<()> {
        let recipes = Recipe::list_all(self.tx)?;
        let users: Vec<i64> = User::list_all(self.tx)?.iter().filter_map(|u| u.id).collect();
        self.progress.start_stage("Seeding comments", recipes.len() as u64);

        for recipe_id in recipes.iter().filter_map(|r| r.id) {
            let count = self.rng.gen_range(2..=10).min(users.len());
            let commenters: Vec<i64> = users.choose_multiple(self.rng, count).copied().collect();
            for author_id in commenters {
                let mut comment = Comment::new(recipe_id, author_id, sentence(self.rng, 4, 16));
                let age = Duration::days(self.rng.gen_range(0..=30))
                    + Duration::seconds(self.rng.gen_range(0..86_400));
                comment.created_at = Some(
                    (Utc::now() - age)
                        .format("%Y-%m-%d %H:%M:%S%.6f")
                        .to_string(),
                );
                comment.insert(self.tx)?;
                self.summary.comments += 1;
            }
            self.progress.increment(1);
        }
        Ok(())
    }

    fn ratings(&mut self) -> Result<()> {
        let recipes = Recipe::list_all(self.tx)?;
        let users: Vec<i64> = User::list_all(self.tx)?.iter().filter_map(|u| u.id).collect();
        self.progress.start_stage("Seeding ratings", recipes.len() as u64);

        for recipe_id in recipes.iter().filter_map(|r| r.id) {
            let count = self.rng.gen_range(5..=20).min(users.len());
            let raters: Vec<i64> = users.choose_multiple(self.rng, count).copied().collect();
            for user_id in raters {
                if Rating::find_for_user(self.tx, user_id, recipe_id)?.is_none() {
                    Rating::submit(self.tx, user_id, recipe_id, self.rng.gen_range(1..=5))?;
                    self.summary.ratings += 1;
                }
            }
            self.progress.increment(1);
        }
        Ok(())
    }

    fn follows(&mut self) -> Result<()> {
        let users: Vec<i64> = User::list_all(self.tx)?.iter().filter_map(|u| u.id).collect();
        self.progress.start_stage("Seeding follows", users.len() as u64);

        let mut fixtures = Vec::new();
        for (username, ..) in FIXTURE_USERS {
            if let Some(id) = User::find_by_username(self.tx, username)?.and_then(|u| u.id) {
                fixtures.push(id);
            }
        }
        for &follower in &fixtures {
            for &target in &fixtures {
                if Follow::follow(self.tx, follower, target)? {
                    self.summary.follows += 1;
                }
            }
        }

        for &follower in &users {
            let count = self.rng.gen_range(5..=30).min(users.len());
            let targets: Vec<i64> = users.choose_multiple(self.rng, count).copied().collect();
            for target in targets {
                if Follow::follow(self.tx, follower, target)? {
                    self.summary.follows += 1;
                }
            }
            self.progress.increment(1);
        }
        Ok(())
    }

    fn favourites(&mut self) -> Result<()> {
        let recipes: Vec<i64> = Recipe::list_all(self.tx)?.iter().filter_map(|r| r.id).collect();
        let users: Vec<i64> = User::list_all(self.tx)?.iter().filter_map(|u| u.id).collect();
        self.progress.start_stage("Seeding favourites", users.len() as u64);

        for &user_id in &users {
            let count = self.rng.gen_range(3..=15).min(recipes.len());
            let picks: Vec<i64> = recipes.choose_multiple(self.rng, count).copied().collect();
            for recipe_id in picks {
                if Favourite::add(self.tx, user_id, recipe_id)? {
                    self.summary.favourites += 1;
                }
            }
            self.progress.increment(1);
        }
        Ok(())
    }
}

fn pick<'a, T>(rng: &mut StdRng, items: &'a [T]) -> &'a T {
    // Callers only pass non-empty slices
    &items[rng.gen_range(0..items.len())]
}

/// A capitalised pseudo-sentence of `min..=max` words
fn sentence(rng: &mut StdRng, min: usize, max: usize) -> String {
    let count = rng.gen_range(min..=max);
    let words: Vec<&str> = (0..count).map(|_| *pick(rng, &WORDS)).collect();
    let text = words.join(" ");
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => format!("{}{}.", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

/// Rows removed by [`unseed`], per table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnseedSummary {
    pub favourites: usize,
    pub follows: usize,
    pub ratings: usize,
    pub comments: usize,
    pub ingredients: usize,
    pub recipes: usize,
    pub tags: usize,
    pub users: usize,
}

/// Delete all content and every non-staff user
pub fn unseed(conn: &mut Connection) -> Result<UnseedSummary> {
    let summary = crate::db::transaction(conn, |tx| {
        let mut summary = UnseedSummary {
            favourites: tx.execute("DELETE FROM favourites", [])?,
            follows: tx.execute("DELETE FROM follows", [])?,
            ratings: tx.execute("DELETE FROM ratings", [])?,
            comments: tx.execute("DELETE FROM comments", [])?,
            ingredients: tx.execute("DELETE FROM recipe_ingredients", [])?,
            recipes: tx.execute("DELETE FROM recipes", [])?,
            ..Default::default()
        };
        for kind in TagKind::ALL {
            summary.tags += Tag::delete_all(tx, kind)?;
        }
        summary.users = tx.execute("DELETE FROM users WHERE is_staff = 0", [])?;
        Ok(summary)
    })?;

    info!(
        "Unseeded {} recipes, {} tags and {} users",
        summary.recipes, summary.tags, summary.users
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema;
    use crate::progress::SilentProgress;
    use tempfile::NamedTempFile;

    fn create_test_db() -> (NamedTempFile, Connection) {
        let temp_file = NamedTempFile::new().unwrap();
        let conn = Connection::open(temp_file.path()).unwrap();
        conn.execute("PRAGMA foreign_keys = ON", []).unwrap();
        schema::migrate(&conn).unwrap();
        (temp_file, conn)
    }

    #[test]
    fn test_seed_small_dataset() {
        let (_temp, mut conn) = create_test_db();
        let progress = SilentProgress::new();

        let summary = DemoData::new()
            .users(12)
            .recipes(15)
            .seed(7)
            .run(&mut conn, &progress)
            .unwrap();

        assert_eq!(User::count(&conn).unwrap(), 12);
        assert_eq!(summary.users, 12);
        assert_eq!(Recipe::list_all(&conn).unwrap().len(), 15);
        assert!(summary.ingredients >= 15 * 3);
        assert!(summary.comments > 0);
        assert!(progress.is_finished());

        for (username, ..) in FIXTURE_USERS {
            assert!(User::find_by_username(&conn, username).unwrap().is_some());
        }
        let john = User::find_by_username(&conn, "@johndoe").unwrap().unwrap();
        let names: Vec<String> = Recipe::find_by_author(&conn, john.id.unwrap())
            .unwrap()
            .into_iter()
            .map(|r| r.recipe_name)
            .collect();
        assert!(names.contains(&"Chocolate Cake".to_string()));

        // Nobody follows themself
        for follow in Follow::list_all(&conn).unwrap() {
            assert_ne!(follow.follower_id, follow.following_id);
        }
        assert_eq!(Tag::list_all(&conn, TagKind::Cuisine).unwrap().len(), CUISINE_TAGS.len());
    }

    #[test]
    fn test_seed_twice_keeps_targets() {
        let (_temp, mut conn) = create_test_db();
        let progress = SilentProgress::new();

        DemoData::new().users(5).recipes(9).seed(1).run(&mut conn, &progress).unwrap();
        let second = DemoData::new().users(5).recipes(9).seed(2).run(&mut conn, &progress).unwrap();

        assert_eq!(second.users, 0);
        assert_eq!(second.recipes, 0);
        assert_eq!(User::count(&conn).unwrap(), 5);
        assert_eq!(Recipe::list_all(&conn).unwrap().len(), 9);
    }

    #[test]
    fn test_unseed_keeps_staff() {
        let (_temp, mut conn) = create_test_db();
        let mut admin = User::new(
            "@admin".to_string(),
            "Ada".to_string(),
            "Admin".to_string(),
            "admin@example.org".to_string(),
        );
        admin.is_staff = true;
        admin.insert(&conn).unwrap();

        DemoData::new()
            .users(6)
            .recipes(4)
            .seed(3)
            .run(&mut conn, &SilentProgress::new())
            .unwrap();

        let removed = unseed(&mut conn).unwrap();
        assert_eq!(removed.recipes, 4);
        assert_eq!(removed.users, 5);
        assert_eq!(removed.tags, DIETARY_TAGS.len() + CUISINE_TAGS.len());

        let remaining = User::list_all(&conn).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].username, "@admin");
        assert!(Recipe::list_all(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_sentence_shape() {
        let mut rng = StdRng::seed_from_u64(9);
        let text = sentence(&mut rng, 3, 3);
        assert!(text.ends_with('.'));
        assert_eq!(text.split_whitespace().count(), 3);
        assert!(text.chars().next().unwrap().is_uppercase());
    }
}
