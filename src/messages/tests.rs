use super::*;

use crate::messages::constants::MAX_TSS_MESSAGE_LEN;
use crate::messages::validate::{MsgErr, Validate};


fn transaction_id(submitter: u64) -> TransactionId {
    TransactionId {
        submitter: NodeId(submitter),
        sequence: 1,
    }
}

fn message() -> TssMessageTransaction {
    TssMessageTransaction {
        transaction_id: transaction_id(1),
        source_roster_hash: RosterHash([1; 32]),
        target_roster_hash: RosterHash([2; 32]),
        share_index: 1,
        tss_message: vec![0xab; 16],
    }
}

fn vote() -> TssVoteTransaction {
    TssVoteTransaction {
        transaction_id: transaction_id(3),
        voter: NodeId(3),
        source_roster_hash: RosterHash([1; 32]),
        target_roster_hash: RosterHash([2; 32]),
        ledger_id: vec![0x01; 97],
        node_signature: vec![0x02; 64],
        tss_vote: vec![0b1011],
    }
}

#[test]
fn validate_tss_message() {
    assert_eq!(message().validate().err(), None);

    let mut zero_index = message();
    zero_index.share_index = 0;
    let validate = Validate::validate(&zero_index).err().expect("an error");
    assert_eq!(validate, MsgErr::InvalidShareIndex);

    let mut empty = message();
    empty.tss_message.clear();
    let validate = Validate::validate(&empty).err().expect("an error");
    assert_eq!(validate, MsgErr::EmptyTssMessage);

    let mut too_big = message();
    too_big.tss_message = vec![0; MAX_TSS_MESSAGE_LEN + 1];
    let validate = Validate::validate(&too_big).err().expect("an error");
    assert_eq!(validate, MsgErr::MsgTooBig);
}

#[test]
fn validate_tss_vote() {
    assert_eq!(vote().validate().err(), None);

    let mut impersonated = vote();
    impersonated.voter = NodeId(4);
    let validate = Validate::validate(&impersonated).err().expect("an error");
    assert_eq!(validate, MsgErr::VoterMustBeSubmitter);

    let mut no_ledger_id = vote();
    no_ledger_id.ledger_id.clear();
    let validate = Validate::validate(&no_ledger_id).err().expect("an error");
    assert_eq!(validate, MsgErr::EmptyLedgerId);

    let mut unsigned = vote();
    unsigned.node_signature.clear();
    let validate = Validate::validate(&unsigned).err().expect("an error");
    assert_eq!(validate, MsgErr::EmptyNodeSignature);

    let mut blank = vote();
    blank.tss_vote.clear();
    let validate = Validate::validate(&blank).err().expect("an error");
    assert_eq!(validate, MsgErr::EmptyVote);
}

#[test]
fn validate_share_signature() {
    let signature = TssShareSignatureTransaction {
        transaction_id: transaction_id(2),
        roster_hash: RosterHash([1; 32]),
        share_index: 3,
        message_hash: vec![7; 48],
        share_signature: vec![],
    };
    let validate = Validate::validate(&signature).err().expect("an error");
    assert_eq!(validate, MsgErr::EmptyShareSignature);
}

#[test]
fn serialize_roster_hash_as_hex() {
    let json = serde_json::to_string(&RosterHash([0xab; 32])).unwrap();
    assert_eq!(json, format!("\"{}\"", "ab".repeat(32)));

    let parsed: RosterHash = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, RosterHash([0xab; 32]));

    let short = format!("\"{}\"", "ab".repeat(31));
    assert!(serde_json::from_str::<RosterHash>(&short).is_err());
}

#[test]
fn serialize_tss_vote() {
    let json = serde_json::to_string(&vote()).unwrap();
    let parsed: TssVoteTransaction = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, vote());
}
