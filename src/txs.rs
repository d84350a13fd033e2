use cosmos_sdk_proto::cosmos::base::v1beta1::Coin;
use cosmos_sdk_proto::cosmos::crypto::secp256k1::PubKey;
use cosmos_sdk_proto::cosmos::tx::signing::v1beta1::SignMode;
use cosmos_sdk_proto::cosmos::tx::v1beta1::{
    mode_info::{Single, Sum},
    AuthInfo, Fee, ModeInfo, SignDoc, SignerInfo, TxBody, TxRaw,
};
use prost::Message;
use prost_types::Any;

use crate::keys::Wallet;
use crate::Result;

pub const PUB_KEY_TYPE_URL: &str = "/cosmos.crypto.secp256k1.PubKey";

pub fn to_any<M: Message>(type_url: &str, msg: &M) -> Any {
    Any {
        type_url: type_url.into(),
        value: msg.encode_to_vec(),
    }
}

pub fn generate_auth_info(public_key: [u8; 33], sequence: u64, gas: u64, fee: Coin) -> AuthInfo {
    let mode_info = ModeInfo {
        sum: Some(Sum::Single(Single {
            mode: SignMode::Direct.into(),
        })),
    };

    let signer_info = SignerInfo {
        public_key: Some(to_any(
            PUB_KEY_TYPE_URL,
            &PubKey {
                key: public_key.to_vec(),
            },
        )),
        mode_info: Some(mode_info),
        sequence,
    };

    let fees = if fee.amount != "0" { vec![fee] } else { vec![] };

    AuthInfo {
        signer_infos: vec![signer_info],
        fee: Some(Fee {
            amount: fees,
            gas_limit: gas,
            payer: "".into(),
            granter: "".into(),
        }),
        ..Default::default()
    }
}

pub fn generate_tx_body(msgs: Vec<Any>, memo: &str) -> TxBody {
    TxBody {
        messages: msgs,
        memo: memo.into(),
        ..Default::default()
    }
}

pub fn generate_sign_doc(
    body: &TxBody,
    auth_info: &AuthInfo,
    chain_id: &str,
    account_number: u64,
) -> SignDoc {
    SignDoc {
        body_bytes: body.encode_to_vec(),
        auth_info_bytes: auth_info.encode_to_vec(),
        chain_id: chain_id.into(),
        account_number,
    }
}

/// SIGN_MODE_DIRECT: signs the encoded sign doc and assembles the raw tx.
pub fn sign_transaction(sign_doc: SignDoc, wallet: &Wallet) -> Result<TxRaw> {
    let signature = wallet.sign(&sign_doc.encode_to_vec())?;
    Ok(TxRaw {
        body_bytes: sign_doc.body_bytes,
        auth_info_bytes: sign_doc.auth_info_bytes,
        signatures: vec![signature.to_vec()],
    })
}
