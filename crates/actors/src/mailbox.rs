use tokio::sync::mpsc;

use crate::{handler::MessageHandler, Actor};

pub(crate) type Envelope<A> = Box<dyn MessageHandler<A>>;

pub struct Mailbox<A: Actor>(mpsc::Sender<Envelope<A>>);

impl<A: Actor> Clone for Mailbox<A> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<A: Actor> Mailbox<A> {
    pub(crate) async fn send(&self, envelope: Envelope<A>) -> Result<(), Envelope<A>> {
        self.0.send(envelope).await.map_err(|why| why.0)
    }

    pub(crate) fn downgrade(&self) -> WeakMailbox<A> {
        WeakMailbox(self.0.downgrade())
    }
}

/// A mailbox handle that does not keep the actor alive.
pub(crate) struct WeakMailbox<A: Actor>(mpsc::WeakSender<Envelope<A>>);

impl<A: Actor> WeakMailbox<A> {
    pub(crate) fn upgrade(&self) -> Option<Mailbox<A>> {
        self.0.upgrade().map(Mailbox)
    }
}

pub struct MailboxReceiver<A: Actor>(mpsc::Receiver<Envelope<A>>);

impl<A: Actor> MailboxReceiver<A> {
    pub(crate) async fn recv(&mut self) -> Option<Envelope<A>> {
        self.0.recv().await
    }
}

pub(crate) fn bounded_mailbox<A>(buffer: usize) -> (Mailbox<A>, MailboxReceiver<A>)
where
    A: Actor,
{
    let (tx, rx) = mpsc::channel(buffer);
    (Mailbox(tx), MailboxReceiver(rx))
}
