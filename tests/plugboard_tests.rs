use rotorforge::machine::Plugboard;
use rotorforge::RotorForgeError;
use rstest::rstest;

fn idx(c: char) -> u8 {
    c as u8 - b'A'
}

#[test]
fn test_pairs_swap_and_rest_pass_through() {
    let board = Plugboard::parse("AB CD").unwrap();
    assert_eq!(board.substitute(idx('A')), idx('B'));
    assert_eq!(board.substitute(idx('B')), idx('A'));
    assert_eq!(board.substitute(idx('C')), idx('D'));
    assert_eq!(board.substitute(idx('D')), idx('C'));
    for c in "EFGHIJKLMNOPQRSTUVWXYZ".chars() {
        assert_eq!(board.substitute(idx(c)), idx(c));
    }
}

#[test]
fn test_board_is_self_inverse() {
    let board = Plugboard::parse("QW ER TY UI OP AS DF GH JK LZ").unwrap();
    for c in 0..26 {
        assert_eq!(board.substitute(board.substitute(c)), c);
    }
}

#[test]
fn test_list_and_string_forms_agree() {
    let a = Plugboard::from_pairs(&["AB", "CD"]).unwrap();
    let b = Plugboard::from_pairs(&["AB CD"]).unwrap();
    let c = Plugboard::parse("ab  cd").unwrap();
    assert_eq!(a, b);
    assert_eq!(a, c);
    assert_eq!(a.pair_strings(), vec!["AB", "CD"]);
}

#[test]
fn test_reused_letter_rejected() {
    let err = Plugboard::parse("AB AC").unwrap_err();
    assert!(matches!(err, RotorForgeError::Config(_)));
}

#[test]
fn test_eleven_pairs_rejected() {
    let err = Plugboard::parse("AB CD EF GH IJ KL MN OP QR ST UV").unwrap_err();
    assert!(err.is_configuration());
}

#[rstest]
#[case("AA")]
#[case("ABC")]
#[case("A")]
#[case("A1")]
#[case("AB C")]
fn test_malformed_pairs_rejected(#[case] input: &str) {
    assert!(matches!(Plugboard::parse(input), Err(RotorForgeError::Config(_))));
}

#[test]
fn test_empty_board_is_identity() {
    let board = Plugboard::parse("").unwrap();
    assert!(board.is_empty());
    assert_eq!(board, Plugboard::default());
}

#[test]
fn test_index_pairs_out_of_range() {
    assert!(Plugboard::from_index_pairs(&[(0, 26)]).is_err());
    assert_eq!(Plugboard::from_index_pairs(&[(0, 25)]).unwrap().pairs(), &[(0, 25)]);
}
