use std::future::IntoFuture;
use std::marker::PhantomData;

/// Turns a parsed request into the input of a service call.
pub trait Intake<I>: 'static + Sync + Send {
    type To;
    fn emit(&self, input: I) -> Self::To;
}

/// Like [`Intake`], for requests that still need validating.
pub trait TryIntake<I>: 'static + Sync + Send {
    type To;
    type Error;
    fn emit(&self, input: I) -> Result<Self::To, Self::Error>;
}

/// Turns the output of a service call into a response.
pub trait Exhaust<I>: 'static + Sync + Send {
    type To;
    fn emit(&self, input: I) -> Self::To;
}

pub struct Controller<T, P, I, D, O> {
    transformer: T,
    presenter: P,
    _i: PhantomData<I>,
    _t: PhantomData<D>,
    _o: PhantomData<O>,
}

impl<T, P, I, D, O> Controller<T, P, I, D, O> {
    pub fn new(transformer: T, presenter: P) -> Self {
        Self {
            transformer,
            presenter,
            _i: PhantomData,
            _t: PhantomData,
            _o: PhantomData,
        }
    }

    fn preset(self) -> P {
        self.presenter
    }
}

impl<T, P, I, D, O> Controller<T, P, I, D, O>
where
    T: Intake<I, To = D>,
{
    pub fn intake(self, input: I) -> Transformed<P, D, O> {
        Transformed {
            transformed: self.transformer.emit(input),
            presenter: self.presenter,
            _o: PhantomData,
        }
    }
}

impl<T, P, I, D, O> Controller<T, P, I, D, O>
where
    T: TryIntake<I, To = D>,
{
    pub fn try_intake(self, input: I) -> Result<Transformed<P, D, O>, T::Error> {
        Ok(Transformed {
            transformed: self.transformer.emit(input)?,
            presenter: self.presenter,
            _o: PhantomData,
        })
    }
}

impl<P, O> Controller<(), P, (), (), O>
where
    P: Exhaust<O>,
{
    /// For requests without any input worth transforming.
    pub async fn bypass<F, Fut, E>(self, f: F) -> Result<P::To, E>
    where
        F: FnOnce() -> Fut,
        Fut: IntoFuture<Output = Result<O, E>>,
    {
        Ok(self.preset().emit(f().await?))
    }
}

pub struct Transformed<P, D, O> {
    transformed: D,
    presenter: P,
    _o: PhantomData<O>,
}

impl<P, D, O> Transformed<P, D, O> {
    pub fn input(&self) -> &D {
        &self.transformed
    }
}

impl<P, D, O> Transformed<P, D, O>
where
    P: Exhaust<O>,
{
    pub async fn handle<F, Fut, E>(self, f: F) -> Result<P::To, E>
    where
        F: FnOnce(D) -> Fut,
        Fut: IntoFuture<Output = Result<O, E>>,
    {
        Ok(self.presenter.emit(f(self.transformed).await?))
    }
}
