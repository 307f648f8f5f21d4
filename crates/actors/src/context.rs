use std::future::Future;

use crate::{
    actor::Actor,
    actor_ref::ActorRef,
    handler::{Handler, Message},
    mailbox::WeakMailbox,
};

/// Handed to every handler invocation. Lets a handler start slow work without
/// blocking the mailbox; the outcome comes back later as an ordinary message.
pub struct Context<A: Actor> {
    mailbox: WeakMailbox<A>,
}

impl<A: Actor> Context<A> {
    pub(crate) fn new(mailbox: WeakMailbox<A>) -> Self {
        Self { mailbox }
    }

    /// A reference to the running actor, `None` once every outside
    /// reference is gone.
    pub fn address(&self) -> Option<ActorRef<A>> {
        self.mailbox.upgrade().map(ActorRef::new)
    }

    /// Run `future` on the runtime and deliver its output to this actor.
    /// Nothing is cancelled: the output is delivered whenever it arrives.
    pub fn spawn<F, M>(&self, future: F)
    where
        F: Future<Output = M> + Send + 'static,
        M: Message,
        A: Handler<M>,
    {
        let Some(actor_ref) = self.address() else {
            log::warn!("actor is shutting down, not spawning work");
            return;
        };
        tokio::spawn(async move {
            let message = future.await;
            if let Err(why) = actor_ref.tell(message).await {
                log::warn!("dropping completion: {}", why);
            }
        });
    }
}
