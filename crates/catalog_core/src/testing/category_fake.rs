//! Seedable category test-data builder.
//!
//! Every property is either random, a fixed value, or a factory receiving the
//! zero-based index of the category being built.

use crate::model::category::{Category, CategoryProps, CATEGORY_NAME_MAX_CHARS};
use crate::model::id::EntityId;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

type Factory<T> = Box<dyn Fn(usize) -> T>;

enum Prop<T> {
    Random,
    Value(T),
    Factory(Factory<T>),
}

impl<T: Clone> Prop<T> {
    fn resolve(&self, index: usize, random: impl FnOnce() -> T) -> T {
        match self {
            Self::Random => random(),
            Self::Value(value) => value.clone(),
            Self::Factory(factory) => factory(index),
        }
    }
}

/// Builds one or many valid-by-default categories.
pub struct CategoryFakeBuilder {
    count: usize,
    rng: StdRng,
    id: Option<Prop<EntityId>>,
    name: Prop<String>,
    description: Prop<Option<String>>,
    active: bool,
    created_at: Option<Prop<i64>>,
}

impl CategoryFakeBuilder {
    /// Builder for a single category; finish with [`Self::build_one`].
    pub fn a_category() -> Self {
        Self::with_count(1)
    }

    /// Builder for `count` categories; finish with [`Self::build`].
    pub fn the_categories(count: usize) -> Self {
        Self::with_count(count)
    }

    fn with_count(count: usize) -> Self {
        Self {
            count,
            rng: StdRng::from_entropy(),
            id: None,
            name: Prop::Random,
            description: Prop::Random,
            active: true,
            created_at: None,
        }
    }

    /// Makes random values reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = Some(Prop::Value(id));
        self
    }

    pub fn with_id_factory(mut self, factory: impl Fn(usize) -> EntityId + 'static) -> Self {
        self.id = Some(Prop::Factory(Box::new(factory)));
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Prop::Value(name.into());
        self
    }

    pub fn with_name_factory(mut self, factory: impl Fn(usize) -> String + 'static) -> Self {
        self.name = Prop::Factory(Box::new(factory));
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Prop::Value(description);
        self
    }

    pub fn with_description_factory(
        mut self,
        factory: impl Fn(usize) -> Option<String> + 'static,
    ) -> Self {
        self.description = Prop::Factory(Box::new(factory));
        self
    }

    pub fn activate(mut self) -> Self {
        self.active = true;
        self
    }

    pub fn deactivate(mut self) -> Self {
        self.active = false;
        self
    }

    /// Epoch milliseconds; defaults to the construction time.
    pub fn with_created_at(mut self, created_at: i64) -> Self {
        self.created_at = Some(Prop::Value(created_at));
        self
    }

    pub fn with_created_at_factory(mut self, factory: impl Fn(usize) -> i64 + 'static) -> Self {
        self.created_at = Some(Prop::Factory(Box::new(factory)));
        self
    }

    /// Random name one character over the limit.
    pub fn with_invalid_name_too_long(mut self) -> Self {
        let name = random_word(&mut self.rng, CATEGORY_NAME_MAX_CHARS + 1);
        self.name = Prop::Value(name);
        self
    }

    pub fn build(mut self) -> Vec<Category> {
        (0..self.count).map(|index| self.make(index)).collect()
    }

    pub fn build_one(mut self) -> Category {
        self.make(0)
    }

    fn make(&mut self, index: usize) -> Category {
        let rng = &mut self.rng;
        let id = self
            .id
            .as_ref()
            .map(|prop| prop.resolve(index, EntityId::new));
        let name = self.name.resolve(index, || {
            let len = rng.gen_range(3..=10);
            random_word(rng, len)
        });
        let description = self
            .description
            .resolve(index, || Some(random_paragraph(rng)));
        let created_at = self
            .created_at
            .as_ref()
            .map(|prop| prop.resolve(index, || 0));

        Category::new(CategoryProps {
            id,
            name,
            description,
            active: Some(self.active),
            created_at,
        })
    }
}

fn random_word(rng: &mut StdRng, len: usize) -> String {
    (0..len)
        .map(|_| char::from(rng.gen_range(b'a'..=b'z')))
        .collect()
}

fn random_paragraph(rng: &mut StdRng) -> String {
    let sentences = rng.gen_range(2..=4);
    (0..sentences)
        .map(|_| {
            let words = rng.gen_range(4..=9);
            let mut sentence = (0..words)
                .map(|_| {
                    let len = rng.gen_range(2..=8);
                    random_word(rng, len)
                })
                .collect::<Vec<_>>()
                .join(" ");
            if let Some(first) = sentence.get_mut(0..1) {
                first.make_ascii_uppercase();
            }
            sentence.push('.');
            sentence
        })
        .collect::<Vec<_>>()
        .join(" ")
}
