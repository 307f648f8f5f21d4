use std::marker::PhantomData;

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::{context::Context, Actor};

#[async_trait]
pub trait Handler<M>: Actor + Sized
where
    M: Message,
{
    async fn handle(&mut self, message: M, ctx: &Context<Self>) -> M::Response;
}

pub trait Message: Send + 'static {
    type Response: Send + 'static;
}

#[async_trait]
pub trait MessageHandler<A: Actor>: Send {
    async fn handle(&mut self, actor: &mut A, ctx: &Context<A>);
}

pub struct ActorMessage<M, A>
where
    M: Message,
    A: Actor,
{
    message: Option<M>,
    respond_to: Option<oneshot::Sender<M::Response>>,
    _phantom_actor: PhantomData<fn() -> A>,
}

impl<M, A> ActorMessage<M, A>
where
    M: Message,
    A: Actor,
{
    pub fn new(message: M, respond_to: Option<oneshot::Sender<M::Response>>) -> Self {
        Self {
            message: Some(message),
            respond_to,
            _phantom_actor: PhantomData,
        }
    }
}

#[async_trait]
impl<M, A> MessageHandler<A> for ActorMessage<M, A>
where
    M: Message,
    A: Handler<M>,
{
    async fn handle(&mut self, actor: &mut A, ctx: &Context<A>) {
        // handled at most once
        let Some(message) = self.message.take() else {
            return;
        };
        let result = actor.handle(message, ctx).await;

        if let Some(respond_to) = self.respond_to.take() {
            respond_to
                .send(result)
                .unwrap_or_else(|_| log::error!("Can not respond to message!"));
        }
    }
}
