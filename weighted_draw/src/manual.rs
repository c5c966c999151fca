/*!

# Preparing the participants file

The raffle reads the first worksheet of an Excel file (`.xlsx` or `.xls`). The first row is
always skipped, whatever it contains, so keep a header there. Each following row describes one
participant:

| A (code) | B (name) | C (weight) |
|----------|----------|------------|
| C1       | Alice    | 10         |
| C2       | Bob      |            |
| C3       | Carol    | 2.5        |

- The **code** identifies a participant across draws: once a code has won, no row with the same
  code can win again until a new cycle starts.
- The **weight** is the relative chance of winning. A blank weight counts as `1`. Zero, negative
  values and anything that is not a number exclude the row.
- Rows without a code or without a name are skipped without any warning.

In the example above, Alice has 10 / 11 = 90.9% chances of winning the first draw and Bob
1 / 11 = 9.1%.

# Running a draw

```bash
fxraffle -i participants.xlsx --draws 3 --seed 42
```

Each draw shuffles names for 3 seconds before showing the winner. Pass `--no-animation` to skip
the shuffle. When a seed is given, the same file gives the same winners, which can then be checked
against a previous summary with `--reference`.

The same can be done from code:

```
use rand::rngs::StdRng;
use rand::SeedableRng;
use weighted_draw::session::RaffleSession;
use weighted_draw::{ingest, Cell};

let rows = vec![
    vec![Cell::from("Code"), Cell::from("Name"), Cell::from("Weight")],
    vec![Cell::from("C1"), Cell::from("Alice"), Cell::Float(10.0)],
    vec![Cell::from("C2"), Cell::from("Bob"), Cell::Empty],
];
let mut rng = StdRng::seed_from_u64(42);
let mut session = RaffleSession::default();
session.load(ingest(&rows)?);
let outcome = session.draw_immediately(&mut rng)?;
assert_eq!(session.history()[0].winner, outcome.winner);
# Ok::<(), Box<dyn std::error::Error>>(())
```

*/
