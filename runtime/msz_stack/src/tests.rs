use super::*;

struct Link {
    next: Option<Box<Link>>,
}

fn chain(len: usize) -> Option<Box<Link>> {
    let mut head = None;
    for _ in 0..len {
        head = Some(Box::new(Link { next: head }));
    }
    head
}

fn depth(link: Option<&Link>) -> usize {
    ensure_sufficient_stack(|| match link {
        None => 0,
        Some(l) => 1 + depth(l.next.as_deref()),
    })
}

fn unlink(mut head: Option<Box<Link>>) {
    // Iterative drop; the default recursive drop would overflow.
    while let Some(mut link) = head {
        head = link.next.take();
    }
}

#[test]
fn short_chain() {
    let head = chain(16);
    assert_eq!(depth(head.as_deref()), 16);
    unlink(head);
}

#[test]
fn long_chain_does_not_overflow() {
    let head = chain(200_000);
    assert_eq!(depth(head.as_deref()), 200_000);
    unlink(head);
}

#[test]
fn passes_result_through() {
    let ok: Result<u64, &str> = ensure_sufficient_stack(|| Ok(24));
    assert_eq!(ok, Ok(24));
}
