use std::panic::AssertUnwindSafe;

use actor::{Actor, SupervisionStrategy};
use actor_ref::ActorRef;
use context::Context;
use futures::FutureExt;
use mailbox::bounded_mailbox;

pub mod actor;
pub mod actor_ref;
pub mod context;
pub mod handler;
pub mod mailbox;

const MAILBOX_SIZE: usize = 32;

/// Creates and runs an actor. Messages are handled one at a time, in arrival
/// order. If the actor panics, it is either restared, resumed or stoped
/// acording to the behavior specified by `Actor::on_fail()`.
pub fn run<A, F>(actor_factory: F) -> ActorRef<A>
where
    A: Actor,
    F: 'static + Send + Fn() -> A,
{
    let (tx, mut rx) = bounded_mailbox(MAILBOX_SIZE);
    let context = Context::new(tx.downgrade());
    let mut actor = actor_factory();
    let actor_ref = ActorRef::new(tx);

    // run actor
    tokio::spawn(async move {
        while let Some(mut message) = rx.recv().await {
            // handle message
            let result = AssertUnwindSafe(message.handle(&mut actor, &context))
                .catch_unwind()
                .await;
            // handler paniced?
            if let Err(why) = result {
                log::error!("actor paniced: {:?}", why);
                match actor.on_fail(why) {
                    SupervisionStrategy::Restart => {
                        actor = actor_factory();
                    }
                    SupervisionStrategy::Resume => {}
                    SupervisionStrategy::Stop => {
                        break;
                    }
                };
            }
        }
        log::debug!("actor stopped");
    });

    actor_ref
}

#[cfg(test)]
mod tests {
    use std::{any::Any, time::Duration};

    use async_trait::async_trait;

    use super::*;
    use crate::handler::{Handler, Message};

    struct Tally {
        entries: Vec<&'static str>,
    }

    impl Actor for Tally {
        fn on_fail(&mut self, _: Box<dyn Any + Send>) -> SupervisionStrategy {
            SupervisionStrategy::Resume
        }
    }

    struct Record(&'static str);

    impl Message for Record {
        type Response = ();
    }

    /// Records "started" now and "finished" once a timer elapses.
    struct Slow;

    impl Message for Slow {
        type Response = ();
    }

    struct Entries;

    impl Message for Entries {
        type Response = Vec<&'static str>;
    }

    struct Explode;

    impl Message for Explode {
        type Response = ();
    }

    #[async_trait]
    impl Handler<Record> for Tally {
        async fn handle(&mut self, message: Record, _: &Context<Self>) {
            self.entries.push(message.0);
        }
    }

    #[async_trait]
    impl Handler<Slow> for Tally {
        async fn handle(&mut self, _: Slow, ctx: &Context<Self>) {
            self.entries.push("started");
            ctx.spawn(async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Record("finished")
            });
        }
    }

    #[async_trait]
    impl Handler<Entries> for Tally {
        async fn handle(&mut self, _: Entries, _: &Context<Self>) -> Vec<&'static str> {
            self.entries.clone()
        }
    }

    #[async_trait]
    impl Handler<Explode> for Tally {
        async fn handle(&mut self, _: Explode, _: &Context<Self>) {
            panic!("boom");
        }
    }

    #[tokio::test]
    async fn spawned_work_completes_after_later_messages() {
        let actor = run(|| Tally { entries: vec![] });
        actor.tell(Slow).await.unwrap();
        actor.tell(Record("meanwhile")).await.unwrap();
        assert_eq!(actor.ask(Entries).await.unwrap(), vec!["started", "meanwhile"]);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(
            actor.ask(Entries).await.unwrap(),
            vec!["started", "meanwhile", "finished"]
        );
    }

    #[tokio::test]
    async fn resumed_actor_keeps_state_after_panic() {
        let actor = run(|| Tally { entries: vec![] });
        actor.tell(Record("before")).await.unwrap();
        actor.tell(Explode).await.unwrap();
        actor.tell(Record("after")).await.unwrap();
        assert_eq!(actor.ask(Entries).await.unwrap(), vec!["before", "after"]);
    }
}
