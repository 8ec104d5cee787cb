use std::marker::PhantomData;

use rand::Rng;

pub trait Generatable {
    fn gen(context: &mut GeneratorContext) -> Self;
}

impl Generatable for String {
    fn gen(context: &mut GeneratorContext) -> Self {
        let id: u64 = context.rng.gen();
        format!("String{:016x}", id)
    }
}

pub struct GeneratorContext {
    pub rng: rand::rngs::ThreadRng,
}

impl GeneratorContext {
    pub fn new() -> GeneratorContext {
        let rng = rand::thread_rng();
        GeneratorContext { rng }
    }

    pub fn gen<T>(&mut self) -> T
    where
        T: Generatable,
    {
        T::gen(self)
    }
}

impl Default for GeneratorContext {
    fn default() -> Self {
        Self::new()
    }
}

pub trait Generator<T> {
    fn gen(&self, context: &mut GeneratorContext) -> T;
}

pub struct FuncGenerator<T, F>
where
    F: Fn(&mut GeneratorContext) -> T,
{
    _t: PhantomData<T>,
    f: F,
}

impl<T, F> Generator<T> for FuncGenerator<T, F>
where
    F: Fn(&mut GeneratorContext) -> T,
{
    fn gen(&self, context: &mut GeneratorContext) -> T {
        (self.f)(context)
    }
}

pub struct VectorGenerator<T, G: Generator<T>> {
    _t: PhantomData<T>,
    g: G,
    min: usize,
    max: usize,
}

impl<T, G: Generator<T>> Generator<Vec<T>> for VectorGenerator<T, G> {
    fn gen(&self, context: &mut GeneratorContext) -> Vec<T> {
        let n = context.rng.gen_range(self.min..=self.max);
        (0..n).map(|_| self.g.gen(context)).collect()
    }
}

pub fn vec_gen<T, G: Generator<T>>(min: usize, max: usize, g: G) -> VectorGenerator<T, G> {
    VectorGenerator {
        _t: PhantomData,
        g,
        min,
        max,
    }
}

pub fn func_gen<T, F>(f: F) -> FuncGenerator<T, F>
where
    F: Fn(&mut GeneratorContext) -> T,
{
    FuncGenerator { _t: PhantomData, f }
}
